use tabled::{Table, Tabled};

use crate::merge::RelocationPlan;
use crate::resource::Resource;

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "TYPE")]
    resource_type: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "DEPS")]
    deps: usize,
}

pub fn resource_table(resources: &[Resource]) -> String {
    let rows = resources.iter().map(|r| ResourceRow {
        resource_type: r.resource_type.clone(),
        name: r.name.clone(),
        id: r.id.clone(),
        deps: r.depends_on.as_ref().map_or(0, Vec::len),
    });
    Table::new(rows).to_string()
}

#[derive(Tabled)]
struct MoveRow {
    #[tabled(rename = "RESOURCE")]
    address: String,
}

pub fn plan_table(plan: &RelocationPlan) -> String {
    let rows = plan.moves.iter().map(|a| MoveRow {
        address: a.to_string(),
    });
    let mut out = Table::new(rows).to_string();
    out.push_str(&format!(
        "\n{} to move, {} already managed",
        plan.moves.len(),
        plan.skipped
    ));
    out
}
