use anyhow::Result;
use std::path::Path;

use crate::report::{self, Gap};

/// Static modernization-gap catalog for the legacy stack under analysis.
fn default_gaps() -> Vec<Gap> {
    vec![
        Gap::new(
            "No RESTful APIs",
            "Prevents integration with modern systems.",
            "REST APIs over the managed backend.",
        ),
        Gap::new(
            "Non-responsive UI",
            "Poor mobile experience.",
            "React-based mobile-first UI.",
        ),
        Gap::new(
            "No AI-driven insights",
            "Missed automation opportunities.",
            "AI recommendations from hosted inference.",
        ),
        Gap::new(
            "Limited scalability",
            "Fails with 10,000+ users.",
            "Horizontally scalable managed backend.",
        ),
    ]
}

pub fn run(output: String, title: String) -> Result<()> {
    report::write_gap_report(Path::new(&output), &title, &default_gaps())
}
