use std::collections::HashMap;

use tracing::{debug, trace};

use crate::ast::{Type, TypeError};

/// Per-pass checker state: the strict flag, the running error count, and
/// the identifier -> type bindings. One per compilation unit.
#[derive(Debug)]
pub struct TypeContext {
    is_strict: bool,
    error_count: usize,
    type_map: HashMap<String, Type>,
    diagnostics: Vec<TypeError>,
}

impl TypeContext {
    pub fn new(is_strict: bool) -> Self {
        TypeContext {
            is_strict,
            error_count: 0,
            type_map: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn is_strict(&self) -> bool {
        self.is_strict
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Did the pass finish without recording anything?
    pub fn passed(&self) -> bool {
        self.error_count == 0
    }

    pub fn diagnostics(&self) -> &[TypeError] {
        &self.diagnostics
    }

    pub fn lookup(&self, name: &str) -> Option<&Type> {
        self.type_map.get(name)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.type_map.contains_key(name)
    }

    /// Bind `name` to `ty`, returning the previous binding if there was
    /// one. Overwriting is not an error here; the checker decides that.
    pub fn declare(&mut self, name: &str, ty: Type) -> Option<Type> {
        self.type_map.insert(name.to_string(), ty)
    }

    pub fn record_error(&mut self, error: TypeError) {
        self.error_count += 1;
        debug!(count = self.error_count, "type error: {error}");
        self.diagnostics.push(error);
    }

    /// Expand custom type names through the identifier map, including
    /// inside composites. Names that are unbound, or that lead back to
    /// themselves, stay as they are.
    pub fn resolve(&self, ty: &Type) -> Type {
        self.resolve_with(ty, &mut Vec::new())
    }

    fn resolve_with<'a>(&'a self, ty: &'a Type, seen: &mut Vec<&'a str>) -> Type {
        match ty {
            Type::Custom(name) => {
                if seen.contains(&name.as_str()) {
                    return ty.clone();
                }
                match self.type_map.get(name) {
                    Some(target) => {
                        seen.push(name);
                        let resolved = self.resolve_with(target, seen);
                        seen.pop();
                        resolved
                    },
                    None => ty.clone(),
                }
            },
            Type::Primitive(_) => ty.clone(),
            Type::Array(element) => Type::array(self.resolve_with(element, seen)),
            Type::Table { key, value } => {
                Type::table(
                    self.resolve_with(key, seen),
                    self.resolve_with(value, seen),
                )
            },
            Type::Function { params, ret } => {
                let params = params
                    .iter()
                    .map(|p| self.resolve_with(p, seen))
                    .collect();
                Type::function(params, self.resolve_with(ret, seen))
            },
        }
    }

    /// Release the context and every type it owns
    pub fn destroy(self) {
        trace!(
            bindings = self.type_map.len(),
            errors = self.error_count,
            "destroying type context"
        );
    }
}
