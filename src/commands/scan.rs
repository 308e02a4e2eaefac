use crate::catalog::{manifest::scan_modules, TypeCatalog, TypeShape};
use crate::config::Config;

/// Handle the `scan` command - builds the catalog once and prints what an
/// admin request would be able to resolve.
pub fn handle_scan_command(config: &Config) {
    let manifests = scan_modules(&config.catalog);
    let catalog = TypeCatalog::build(manifests);

    println!("📦 Modules ({}):", catalog.modules().len());
    for module in catalog.modules() {
        println!("  {module}");
    }

    let mut entries: Vec<_> = catalog.entries().collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    println!("\n🧩 Types ({}):", entries.len());
    for entry in entries {
        match &entry.shape {
            TypeShape::Service { methods } => {
                println!("  {} [service, module {}]", entry.name, entry.module);
                for method in methods {
                    let params: Vec<String> = method
                        .parameters
                        .iter()
                        .map(|p| {
                            if p.nullable {
                                format!("{}?", p.type_name)
                            } else {
                                p.type_name.clone()
                            }
                        })
                        .collect();
                    println!("    .{}({})", method.name, params.join(", "));
                }
            }
            TypeShape::Record { fields } => {
                println!(
                    "  {} [record, {} fields, module {}]",
                    entry.name,
                    fields.len(),
                    entry.module
                );
            }
            TypeShape::List { element } => {
                println!("  {} [list of {element}, module {}]", entry.name, entry.module);
            }
            TypeShape::Opaque => {
                println!("  {} [host-injected]", entry.name);
            }
        }
    }

    println!("\n🔎 Indexed signatures: {}", catalog.signature_count());
}
