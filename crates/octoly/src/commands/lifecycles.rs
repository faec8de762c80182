//! Lifecycle command handlers.

use tabled::Tabled;

use octoly_core::model::RetentionPolicy;
use octoly_core::{LifecycleResource, ResourceId};

use crate::cli::ResourceArgs;
use crate::error::CliError;

use super::resources::{self, ResourceView};
use super::{Context, util};

#[derive(Tabled)]
pub struct LifecycleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phases")]
    phases: usize,
    #[tabled(rename = "Release retention")]
    retention: String,
}

impl ResourceView for LifecycleResource {
    type Row = LifecycleRow;

    fn row(&self) -> LifecycleRow {
        LifecycleRow {
            id: util::or_dash(self.id.as_ref().map(ResourceId::as_str)),
            name: self.name.clone(),
            phases: self.phases.len(),
            retention: self
                .release_retention_policy
                .as_ref()
                .map_or_else(|| "-".into(), RetentionPolicy::summary),
        }
    }

    fn detail(&self) -> String {
        let mut lines = vec![
            format!("ID:          {}", util::or_dash(self.id.as_ref().map(ResourceId::as_str))),
            format!("Name:        {}", self.name),
            format!("Description: {}", util::or_dash(self.description.as_deref())),
        ];
        if let Some(ref policy) = self.release_retention_policy {
            lines.push(format!("Releases:    keep {}", policy.summary()));
        }
        if let Some(ref policy) = self.tentacle_retention_policy {
            lines.push(format!("Tentacles:   keep {}", policy.summary()));
        }
        for (n, phase) in self.phases.iter().enumerate() {
            let optional = if phase.is_optional_phase { " (optional)" } else { "" };
            lines.push(format!("Phase {}:     {}{optional}", n + 1, phase.name));
        }
        lines.join("\n")
    }
}

pub async fn handle(args: ResourceArgs, ctx: Context<'_>) -> Result<(), CliError> {
    resources::handle::<LifecycleResource>(args.command, ctx).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn detail_numbers_phases() {
        let lifecycle: LifecycleResource = serde_json::from_value(json!({
            "Id": "Lifecycles-1",
            "Name": "Default Lifecycle",
            "Phases": [
                { "Name": "Dev" },
                { "Name": "Prod", "IsOptionalPhase": true }
            ]
        }))
        .unwrap();

        let detail = lifecycle.detail();
        assert!(detail.contains("Phase 1:     Dev"));
        assert!(detail.contains("Phase 2:     Prod (optional)"));
        assert_eq!(lifecycle.row().phases, 2);
    }
}
