use anyhow::Result;
use std::path::Path;

use crate::report;

/// Static system-inventory entries for the legacy stack under analysis.
fn default_inventory() -> Vec<String> {
    [
        "Components: ASP.NET Web Forms, ADO.NET, Microsoft SQL Server 2008 R2",
        "Features: Policy search via GridView",
        "Database: Policies table (Id, PolicyNumber, CustomerName, Premium, IssueDate)",
        "Dependencies: IIS 7.5, .NET Framework 4.0",
        "Issues: Slow queries (5-10s), non-responsive UI, no APIs",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn run(output: String, title: String) -> Result<()> {
    report::write_inventory_report(Path::new(&output), &title, &default_inventory())
}
