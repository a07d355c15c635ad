//! Table initialisation command
//!
//! Usage: docstore init [--db PATH] [--table NAME]

use super::Target;

/// Execute init
pub fn execute(target: &Target) -> Result<(), Box<dyn std::error::Error>> {
    target.connect()?;
    println!(
        "✓ Table {} ready in {}",
        target.table,
        target.db.display()
    );
    Ok(())
}
