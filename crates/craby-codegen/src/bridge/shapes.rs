use indexmap::IndexSet;

use crate::bind::BoundModule;
use crate::types::TargetType;

/// A type the bridge has to declare on both sides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    Enum(String),
    Record(String),
    /// Mirror struct for a nullable value; holds the full `Nullable` type.
    Nullable(TargetType),
}

/// Bridge types in dependency order: every shape comes after the shapes it contains.
pub fn bridge_shapes(module: &BoundModule) -> Vec<Shape> {
    let mut walker = ShapeWalker {
        module,
        shapes: IndexSet::new(),
    };

    for record in &module.records {
        walker.visit(&TargetType::Record(record.js_name.clone()));
    }
    for e in &module.enums {
        walker.visit(&TargetType::Enum(e.js_name.clone()));
    }
    for method in &module.methods {
        for param in &method.params {
            walker.visit(&param.ty);
        }
        walker.visit(&method.ret);
    }

    walker.shapes.into_iter().collect()
}

struct ShapeWalker<'a> {
    module: &'a BoundModule,
    shapes: IndexSet<Shape>,
}

impl ShapeWalker<'_> {
    fn visit(&mut self, ty: &TargetType) {
        match ty {
            TargetType::Array(inner) | TargetType::Promise(inner) => self.visit(inner),
            TargetType::Nullable(inner) => {
                self.visit(inner);
                self.shapes.insert(Shape::Nullable(ty.clone()));
            }
            TargetType::Enum(name) => {
                self.shapes.insert(Shape::Enum(name.clone()));
            }
            TargetType::Record(name) => {
                let shape = Shape::Record(name.clone());
                if self.shapes.contains(&shape) {
                    return;
                }
                // Record graphs are acyclic by the time they get here.
                if let Some(record) = self.module.record(name) {
                    for field in &record.fields {
                        self.visit(&field.ty);
                    }
                }
                self.shapes.insert(shape);
            }
            _ => {}
        }
    }
}
