use serde::Serialize;

use crate::api::ApiClient;
use crate::category::Category;
use crate::error::ApiResult;
use crate::model::{Area, Project};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaGroup {
    pub area: Area,
    pub projects: Vec<Project>,
}

/// Navigation tree: the fixed category views, projects without an area, and
/// one group per area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sidebar {
    pub categories: Vec<Category>,
    pub standalone: Vec<Project>,
    pub areas: Vec<AreaGroup>,
}

impl Sidebar {
    /// Groups `projects` under `areas`, keeping backend order. Projects that
    /// point at an area not in `areas` are left out.
    pub fn assemble(areas: Vec<Area>, projects: Vec<Project>) -> Self {
        let standalone = projects
            .iter()
            .filter(|project| project.is_standalone())
            .cloned()
            .collect();

        let areas = areas
            .into_iter()
            .map(|area| {
                let projects = projects
                    .iter()
                    .filter(|project| project.area_id == Some(area.id))
                    .cloned()
                    .collect();
                AreaGroup { area, projects }
            })
            .collect();

        Self {
            categories: Category::ALL.to_vec(),
            standalone,
            areas,
        }
    }

    pub async fn load(client: &ApiClient) -> ApiResult<Self> {
        let areas = client.list_areas().await?;
        let projects = client.list_projects().await?;
        tracing::debug!(
            areas = areas.len(),
            projects = projects.len(),
            "sidebar data loaded"
        );
        Ok(Self::assemble(areas, projects))
    }
}
