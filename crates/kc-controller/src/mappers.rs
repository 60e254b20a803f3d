//! Protocol mapper synchronization for clients and client scopes.

use kc_admin::dto::ProtocolMapperRepresentation;
use kc_admin::{AdminClient, AdminError, MapperOwner};
use kc_model::MapperSpec;
use tracing::info;

use crate::error::ReconcileResult;
use crate::sync::{SyncReport, plan};

/// Returns true if an observed mapper already holds the declared type and
/// configuration.
#[must_use]
pub fn mapper_matches(desired: &MapperSpec, observed: &ProtocolMapperRepresentation) -> bool {
    desired.protocol_mapper == observed.protocol_mapper && desired.config == observed.config
}

/// Builds the representation of a declared mapper.
#[must_use]
pub fn representation(spec: &MapperSpec) -> ProtocolMapperRepresentation {
    ProtocolMapperRepresentation {
        protocol: Some(spec.protocol().to_string()),
        config: spec.config.clone(),
        ..ProtocolMapperRepresentation::new(&spec.name, &spec.protocol_mapper)
    }
}

fn observed_id<'a>(mapper: &'a ProtocolMapperRepresentation, path: &str) -> ReconcileResult<&'a str> {
    mapper.id.as_deref().ok_or_else(|| {
        AdminError::protocol(format!("{path}: mapper {} was listed without id", mapper.name))
            .into()
    })
}

/// Brings the mappers of `owner` in line with `desired`.
///
/// Stops at the first failing call; a later pass picks up the remaining
/// work since every mapper is matched by name again.
pub async fn sync_mappers(
    admin: &dyn AdminClient,
    realm: &str,
    owner: MapperOwner<'_>,
    desired: &[MapperSpec],
    path: &str,
) -> ReconcileResult<SyncReport> {
    let observed = admin.protocol_mappers(realm, owner).await?;
    let plan = plan("mapper", desired, &observed, mapper_matches)?;

    let mut report = SyncReport {
        unchanged: plan.unchanged,
        ..SyncReport::default()
    };

    for spec in plan.create {
        let id = admin
            .create_protocol_mapper(realm, owner, &representation(spec))
            .await?;
        info!("{path}: created mapper {} ({id})", spec.name);
        report.record_created();
    }

    for (spec, existing) in plan.update {
        let id = observed_id(existing, path)?;
        let mut mapper = existing.clone();
        mapper.protocol_mapper.clone_from(&spec.protocol_mapper);
        mapper.config.clone_from(&spec.config);
        admin.update_protocol_mapper(realm, owner, id, &mapper).await?;
        info!("{path}: updated mapper {}", spec.name);
        report.record_updated();
    }

    for existing in plan.delete {
        let id = observed_id(existing, path)?;
        admin.delete_protocol_mapper(realm, owner, id).await?;
        info!("{path}: deleted obsolete mapper {}", existing.name);
        report.record_deleted();
    }

    Ok(report)
}
