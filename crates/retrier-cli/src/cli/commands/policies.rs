//! `retrier policies` – list the registry.

use retrier_core::policy::registry;

pub fn run_policies() {
    let registry = registry::global();
    for (name, params) in registry.iter() {
        let params: Vec<String> = params
            .iter()
            .map(|p| format!("{}: {}", p.name, p.expected))
            .collect();
        println!("{}  {{ {} }}", name, params.join(", "));
    }
}
