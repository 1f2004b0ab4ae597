//! The Virtual Model: the registry binding source variables to their
//! chosen encodings, and the working state `compile!` mutates as it runs.

use crate::encoding::VariableAllocator;
use crate::error::{QuboError, Result};
use crate::model::virtual_variable::VirtualVariable;
use crate::pbf::Pbf;
use crate::types::VI;
use std::collections::HashMap;
use std::time::Duration;

/// Where a compilation run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilationStatus {
    NotStarted,
    InProgress,
    LocallyCompiled,
    Failed,
}

/// The registry of virtual variables plus the compiler's working
/// Hamiltonian-building state.
///
/// Invariants, enforced by [`VirtualModel::register`]:
/// - every non-auxiliary virtual variable has a source `VI` unique across
///   the registry (a source is encoded at most once);
/// - every target `VI` is owned by exactly one virtual variable (targets
///   never alias).
#[derive(Debug, Clone)]
pub struct VirtualModel {
    variables: Vec<VirtualVariable>,
    by_source: HashMap<VI, usize>,
    by_target: HashMap<VI, usize>,
    num_source_vars: usize,
    next_vi: usize,
    status: CompilationStatus,
    compilation_time: Option<Duration>,
}

impl VirtualModel {
    /// A fresh, empty model. `num_source_vars` seeds the allocator so the
    /// first auxiliary/target variable introduced never collides with a
    /// source variable's own `VI`.
    pub fn new(num_source_vars: usize) -> Self {
        Self {
            variables: Vec::new(),
            by_source: HashMap::new(),
            by_target: HashMap::new(),
            num_source_vars,
            next_vi: num_source_vars,
            status: CompilationStatus::NotStarted,
            compilation_time: None,
        }
    }

    pub fn status(&self) -> CompilationStatus {
        self.status
    }

    pub fn set_status(&mut self, status: CompilationStatus) {
        self.status = status;
    }

    pub fn compilation_time(&self) -> Option<Duration> {
        self.compilation_time
    }

    pub fn set_compilation_time(&mut self, elapsed: Duration) {
        self.compilation_time = Some(elapsed);
    }

    /// Empties all derived state (virtual variables, source/target maps,
    /// the allocator counter, the recorded compile duration) and returns
    /// the status to `NotStarted`, so a failed or completed compile can be
    /// retried from a clean slate without building a new model. The
    /// allocator headroom reserved for source variables is preserved.
    pub fn reset(&mut self) {
        self.variables.clear();
        self.by_source.clear();
        self.by_target.clear();
        self.next_vi = self.num_source_vars;
        self.status = CompilationStatus::NotStarted;
        self.compilation_time = None;
    }

    /// Register a virtual variable, checking the uniqueness invariants.
    pub fn register(&mut self, vv: VirtualVariable) -> Result<()> {
        if let Some(source) = vv.source {
            if self.by_source.contains_key(&source) {
                return Err(QuboError::CompilationFailure(format!(
                    "source variable {source} already has a registered encoding"
                )));
            }
        }
        for &t in &vv.targets {
            if self.by_target.contains_key(&t) {
                return Err(QuboError::CompilationFailure(format!(
                    "target variable {t} is already owned by another virtual variable"
                )));
            }
        }

        let idx = self.variables.len();
        if let Some(source) = vv.source {
            self.by_source.insert(source, idx);
        }
        for &t in &vv.targets {
            self.by_target.insert(t, idx);
        }
        self.variables.push(vv);
        Ok(())
    }

    pub fn lookup_source(&self, source: VI) -> Option<&VirtualVariable> {
        self.by_source.get(&source).map(|&i| &self.variables[i])
    }

    pub fn lookup_target(&self, target: VI) -> Option<&VirtualVariable> {
        self.by_target.get(&target).map(|&i| &self.variables[i])
    }

    /// The expansion polynomial ξ for an encoded source variable. Fails
    /// with `CompilationFailure` if `source` has not been encoded yet —
    /// the translator must never read an expansion before the encoder
    /// stage has produced it.
    pub fn expansion_of(&self, source: VI) -> Result<&Pbf> {
        self.lookup_source(source)
            .map(|vv| &vv.expansion)
            .ok_or_else(|| {
                QuboError::CompilationFailure(format!(
                    "source variable {source} has no registered encoding"
                ))
            })
    }

    pub fn penalty_of(&self, source: VI) -> Option<&Pbf> {
        self.lookup_source(source).and_then(|vv| vv.penalty.as_ref())
    }

    pub fn variables(&self) -> &[VirtualVariable] {
        &self.variables
    }

    /// Sum of every registered encoding's per-variable penalty (the `h`
    /// contribution to the assembled Hamiltonian). Variables with no
    /// penalty (Mirror, Unary, Binary, Arithmetic) contribute nothing.
    pub fn total_encoding_penalty(&self) -> Pbf {
        let mut total = Pbf::zero();
        for vv in &self.variables {
            if let Some(h) = &vv.penalty {
                total += h;
            }
        }
        total
    }

    pub fn num_targets(&self) -> usize {
        self.by_target.len()
    }
}

impl VariableAllocator for VirtualModel {
    fn allocate(&mut self, n: usize) -> Vec<VI> {
        let out: Vec<VI> = (self.next_vi..self.next_vi + n).map(VI).collect();
        self.next_vi += n;
        out
    }
}
