//! The call interface the dispatcher drives. The solving engine lives behind
//! it; this crate only forwards recognized statements.

use crate::core::ast::{Constraint, Expr, Interval, LetBinding, MinMaxMode, PavingMode, PlotAxes, VarKind};
use crate::core::error::DomainError;
use crate::core::number::{NumberLiteral, Numeral};

pub type EngineResult = Result<(), DomainError>;

pub trait Engine {
    /// Consulted before each statement is parsed; gates `approx(..)`.
    fn is_safe_input(&self) -> bool;

    // Declarations
    fn declare_variable(&mut self, name: &str, interval: &Interval, kind: VarKind) -> EngineResult;
    fn declare_constant(&mut self, name: &str, value: &Numeral) -> EngineResult;
    fn define(&mut self, name: &str, expr: &Expr) -> EngineResult;

    // Problem; `env` is the statement's let chain, empty when there is none
    fn set_objective(&mut self, expr: &Expr, env: &[LetBinding]) -> EngineResult;
    fn set_differential(&mut self, expr: &Expr, env: &[LetBinding]) -> EngineResult;
    fn add_constraint(&mut self, constraint: &Constraint, env: &[LetBinding]) -> EngineResult;

    // Configuration
    fn set_precision(&mut self, value: &Numeral) -> EngineResult;
    fn set_resolution(&mut self, value: NumberLiteral) -> EngineResult;
    fn set_variable_resolution(&mut self, name: &str, value: NumberLiteral) -> EngineResult;
    fn set_granularity(&mut self, value: NumberLiteral) -> EngineResult;
    fn set_depth(&mut self, value: NumberLiteral) -> EngineResult;
    fn set_var_select(&mut self, value: NumberLiteral) -> EngineResult;
    fn set_bp(&mut self, value: bool) -> EngineResult;
    fn set_safe_input(&mut self, value: bool) -> EngineResult;
    fn set_debug(&mut self, value: bool) -> EngineResult;
    fn set_name(&mut self, name: &str) -> EngineResult;
    /// An empty name routes output back to stdout.
    fn set_output(&mut self, file: &str) -> EngineResult;
    fn set_paving_mode(&mut self, mode: PavingMode) -> EngineResult;

    // Solver actions
    fn pave(&mut self) -> EngineResult;
    fn bifurcation(&mut self, equilibrium: bool) -> EngineResult;
    fn minmax(&mut self, mode: MinMaxMode) -> EngineResult;
    fn save_paving(&mut self, name: &str) -> EngineResult;
    fn load_paving(&mut self, name: &str) -> EngineResult;
    fn plot(&mut self, name: &str, axes: &PlotAxes) -> EngineResult;

    /// Clears variables, constraints and configuration back to defaults.
    fn reset_session(&mut self);
}
