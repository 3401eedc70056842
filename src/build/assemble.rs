use super::build_types::CompiledModule;

/// Expression the wrapper is invoked with: the host global object.
const GLOBAL_OBJECT: &str = "this";

/// Serializes a compiled module into a self-invoking script that installs
/// `namespace` on the global object and assigns every unit in order.
pub fn serialize(module: &CompiledModule, helpers: &str, namespace: &str) -> String {
    let mut lines = Vec::with_capacity(module.len() + 2);
    lines.push(format!("(function(G){{G['{namespace}']={helpers};"));
    lines.extend(module.units().iter().map(|unit| unit.assignment(namespace)));
    lines.push(format!("}})({GLOBAL_OBJECT});\n"));
    lines.join("\n")
}
