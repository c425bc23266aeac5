//! Maps each parsed statement to exactly one engine call.

use crate::core::ast::{MinMaxMode, Setting, SolverAction, Statement};
use crate::core::engine::Engine;
use crate::core::error::DomainError;

/// What a statement turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    /// One engine call was made and succeeded.
    Engine,
    /// Nothing for the engine; the canonical text is handed back to the caller.
    Echo(String),
    /// Session control, left to the embedding session.
    Control,
}

pub fn dispatch<E: Engine + ?Sized>(statement: &Statement, engine: &mut E) -> Result<Dispatched, DomainError> {
    match statement {
        Statement::Declare { name, interval, kind } => engine.declare_variable(name, interval, *kind)?,
        Statement::Const { name, value } => engine.declare_constant(name, value)?,
        Statement::Objective { bindings, expr } => engine.set_objective(expr, bindings)?,
        Statement::Differential { bindings, expr } => engine.set_differential(expr, bindings)?,
        Statement::Constraint { bindings, constraint } => engine.add_constraint(constraint, bindings)?,
        Statement::Define { name, expr } => engine.define(name, expr)?,
        Statement::Set(setting) => apply_setting(setting, engine)?,
        Statement::ResetOutput => engine.set_output("")?,
        Statement::Action(action) => match action {
            SolverAction::Pave => engine.pave()?,
            SolverAction::Bifurcation => engine.bifurcation(false)?,
            SolverAction::Equilibrium => engine.bifurcation(true)?,
            SolverAction::Min => engine.minmax(MinMaxMode::Min)?,
            SolverAction::Max => engine.minmax(MinMaxMode::Max)?,
            SolverAction::MinMax => engine.minmax(MinMaxMode::Both)?,
            SolverAction::Reset => engine.reset_session(),
        },
        Statement::SavePaving(name) => engine.save_paving(name)?,
        Statement::LoadPaving(name) => engine.load_paving(name)?,
        Statement::Plot { name, axes } => engine.plot(name, axes)?,
        Statement::Forall(_) => return Ok(Dispatched::Echo(statement.to_string())),
        Statement::ReadFile(_) | Statement::Quit | Statement::Help => return Ok(Dispatched::Control),
    }
    Ok(Dispatched::Engine)
}

fn apply_setting<E: Engine + ?Sized>(setting: &Setting, engine: &mut E) -> Result<(), DomainError> {
    match setting {
        Setting::Precision(n) => engine.set_precision(n),
        Setting::Resolution(n) => engine.set_resolution(*n),
        Setting::VariableResolution { name, value } => engine.set_variable_resolution(name, *value),
        Setting::Granularity(n) => engine.set_granularity(*n),
        Setting::Depth(n) => engine.set_depth(*n),
        Setting::VarSelect(n) => engine.set_var_select(*n),
        Setting::Bp(b) => engine.set_bp(*b),
        Setting::SafeInput(b) => engine.set_safe_input(*b),
        Setting::Debug(b) => engine.set_debug(*b),
        Setting::Name(name) => engine.set_name(name),
        Setting::Output(file) => engine.set_output(file),
        Setting::PavingMode(mode) => engine.set_paving_mode(*mode),
    }
}
