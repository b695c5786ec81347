//! Records are passed by value across the bridge, so a record that contains itself
//! (directly, through another record, or through an array or nullable) has no finite
//! layout. Arrays would break the cycle in Rust but not in the generated C++ mirror,
//! so every path counts.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::ir::RecordType;

pub fn check_record_cycles(records: &[RecordType], diag: &mut Diagnostics) {
    let graph: IndexMap<&str, (&RecordType, Vec<&str>)> = records
        .iter()
        .map(|r| {
            let deps = r.fields.iter().flat_map(|f| f.ty.named()).collect();
            (r.name.as_str(), (r, deps))
        })
        .collect();

    let mut finder = CycleFinder {
        graph: &graph,
        visiting: IndexSet::new(),
        done: HashSet::new(),
        cycles: Vec::new(),
    };
    for name in graph.keys() {
        finder.visit(*name);
    }

    for cycle in finder.cycles {
        let Some((record, _)) = graph.get(cycle[0]) else {
            continue;
        };
        let path = cycle
            .iter()
            .chain(std::iter::once(&cycle[0]))
            .map(|n| format!("`{n}`"))
            .collect::<Vec<_>>()
            .join(" -> ");
        diag.report(DiagnosticKind::RecordCycle, record.span)
            .message(path)
            .emit();
    }
}

struct CycleFinder<'g, 'a> {
    graph: &'g IndexMap<&'a str, (&'a RecordType, Vec<&'a str>)>,
    visiting: IndexSet<&'a str>,
    done: HashSet<&'a str>,
    cycles: Vec<Vec<&'a str>>,
}

impl<'g, 'a> CycleFinder<'g, 'a> {
    fn visit(&mut self, name: &'a str) {
        if self.done.contains(name) {
            return;
        }
        if let Some(pos) = self.visiting.get_index_of(name) {
            let cycle = self.visiting.iter().skip(pos).copied().collect();
            self.cycles.push(cycle);
            return;
        }
        let graph = self.graph;
        let Some((_, deps)) = graph.get(name) else {
            // Enums and unknown names end the walk.
            return;
        };

        self.visiting.insert(name);
        for dep in deps {
            self.visit(*dep);
        }
        self.visiting.pop();
        self.done.insert(name);
    }
}
