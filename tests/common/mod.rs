//! Engine test double that logs each call by name.
#![allow(dead_code)]

use kodiak_lang::core::ast::{
    Constraint, Expr, Interval, LetBinding, MinMaxMode, PavingMode, PlotAxes, VarKind,
};
use kodiak_lang::core::engine::{Engine, EngineResult};
use kodiak_lang::core::error::DomainError;
use kodiak_lang::core::number::{NumberLiteral, Numeral};

#[derive(Debug, Default)]
pub struct RecordingEngine {
    pub calls: Vec<String>,
    pub unsafe_input: bool,
    /// Calls with this name fail with a domain error.
    pub fail_on: Option<&'static str>,
    pub resets: usize,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, call: String) -> EngineResult {
        let name = call.split(' ').next().unwrap_or_default().to_string();
        self.calls.push(call);
        if self.fail_on == Some(name.as_str()) {
            return Err(DomainError::new(format!("{} rejected", name)));
        }
        Ok(())
    }

    pub fn names(&self) -> Vec<&str> {
        self.calls.iter().map(|c| c.split(' ').next().unwrap_or_default()).collect()
    }
}

impl Engine for RecordingEngine {
    fn is_safe_input(&self) -> bool {
        !self.unsafe_input
    }
    fn declare_variable(&mut self, name: &str, interval: &Interval, kind: VarKind) -> EngineResult {
        self.record(format!("declare_variable {} {} {:?}", name, interval, kind))
    }
    fn declare_constant(&mut self, name: &str, value: &Numeral) -> EngineResult {
        self.record(format!("declare_constant {} {}", name, value))
    }
    fn define(&mut self, name: &str, expr: &Expr) -> EngineResult {
        self.record(format!("define {} {}", name, expr))
    }
    fn set_objective(&mut self, expr: &Expr, env: &[LetBinding]) -> EngineResult {
        self.record(format!("set_objective {} env={}", expr, env.len()))
    }
    fn set_differential(&mut self, expr: &Expr, env: &[LetBinding]) -> EngineResult {
        self.record(format!("set_differential {} env={}", expr, env.len()))
    }
    fn add_constraint(&mut self, constraint: &Constraint, env: &[LetBinding]) -> EngineResult {
        self.record(format!("add_constraint {} env={}", constraint, env.len()))
    }
    fn set_precision(&mut self, value: &Numeral) -> EngineResult {
        self.record(format!("set_precision {}", value))
    }
    fn set_resolution(&mut self, value: NumberLiteral) -> EngineResult {
        self.record(format!("set_resolution {}", value))
    }
    fn set_variable_resolution(&mut self, name: &str, value: NumberLiteral) -> EngineResult {
        self.record(format!("set_variable_resolution {} {}", name, value))
    }
    fn set_granularity(&mut self, value: NumberLiteral) -> EngineResult {
        self.record(format!("set_granularity {}", value))
    }
    fn set_depth(&mut self, value: NumberLiteral) -> EngineResult {
        self.record(format!("set_depth {}", value))
    }
    fn set_var_select(&mut self, value: NumberLiteral) -> EngineResult {
        self.record(format!("set_var_select {}", value))
    }
    fn set_bp(&mut self, value: bool) -> EngineResult {
        self.record(format!("set_bp {}", value))
    }
    fn set_safe_input(&mut self, value: bool) -> EngineResult {
        self.unsafe_input = !value;
        self.record(format!("set_safe_input {}", value))
    }
    fn set_debug(&mut self, value: bool) -> EngineResult {
        self.record(format!("set_debug {}", value))
    }
    fn set_name(&mut self, name: &str) -> EngineResult {
        self.record(format!("set_name {}", name))
    }
    fn set_output(&mut self, file: &str) -> EngineResult {
        self.record(format!("set_output {:?}", file))
    }
    fn set_paving_mode(&mut self, mode: PavingMode) -> EngineResult {
        self.record(format!("set_paving_mode {}", mode.name()))
    }
    fn pave(&mut self) -> EngineResult {
        self.record("pave".into())
    }
    fn bifurcation(&mut self, equilibrium: bool) -> EngineResult {
        self.record(format!("bifurcation {}", equilibrium))
    }
    fn minmax(&mut self, mode: MinMaxMode) -> EngineResult {
        self.record(format!("minmax {:?}", mode))
    }
    fn save_paving(&mut self, name: &str) -> EngineResult {
        self.record(format!("save_paving {}", name))
    }
    fn load_paving(&mut self, name: &str) -> EngineResult {
        self.record(format!("load_paving {}", name))
    }
    fn plot(&mut self, name: &str, axes: &PlotAxes) -> EngineResult {
        self.record(format!("plot {} {}", name, axes.names().join(" ")))
    }
    fn reset_session(&mut self) {
        self.resets += 1;
        self.unsafe_input = false;
        self.calls.push("reset_session".into());
    }
}
