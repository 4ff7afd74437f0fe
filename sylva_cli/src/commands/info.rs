//! Subsystem descriptions and archetype listing.

use sylva_rules::MetaphorCatalog;

use crate::display;

/// Print subsystem descriptions and archetypes.
pub fn handle_info(catalog: &MetaphorCatalog) -> i32 {
    print!("{}", display::subsystem_info(catalog));
    0
}
