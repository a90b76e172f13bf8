//! Services command handler.

use chainchat_core::ServiceRegistry;

use crate::presentation::{print_separator, truncate_string};

/// Print the service catalog.
pub fn execute(registry: &ServiceRegistry) {
    println!(
        "{:<22} {:<6} {:<38} {:<5} NAME",
        "SERVICE", "METHOD", "ENDPOINT", "FILES"
    );
    print_separator(90);
    for descriptor in registry.iter() {
        println!(
            "{:<22} {:<6} {:<38} {:<5} {}",
            descriptor.id.as_str(),
            descriptor.method.as_str(),
            truncate_string(descriptor.endpoint, 38),
            if descriptor.id.accepts_files() { "yes" } else { "" },
            descriptor.display_name,
        );
    }
}
