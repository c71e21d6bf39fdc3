//! Tool Router - builds the rmcp ToolRouter from the registered tools.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::core::config::Config;

use super::definitions::catalogue::{ALL_DATASETS, CatalogueTool};
use super::definitions::RegistrationCarTool;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(config: Arc<Config>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    let router = ALL_DATASETS
        .iter()
        .copied()
        .fold(ToolRouter::new(), |router, dataset| {
            router.with_route(CatalogueTool::new(dataset).create_route(config.clone()))
        });

    router.with_route(RegistrationCarTool::create_route(config))
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;

    struct TestServer {}

    fn test_config() -> Arc<Config> {
        Arc::new(Config::default())
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(test_config());
        let tools = router.list_all();
        assert_eq!(tools.len(), 6);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"population_malaysia"));
        assert!(names.contains(&"population_state"));
        assert!(names.contains(&"births"));
        assert!(names.contains(&"fuelprice"));
        assert!(names.contains(&"hh_income"));
        assert!(names.contains(&"registration_transactions_car"));
    }

    #[test]
    fn test_registry_matches_router() {
        let registry = ToolRegistry::new(test_config());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(test_config());
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
