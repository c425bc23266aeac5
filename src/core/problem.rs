//! In-crate reference engine: accumulates the problem a session describes and
//! records the solver requests made against it. No solving happens here.

use crate::config::Settings;
use crate::core::ast::{
    Constraint, Expr, Interval, LetBinding, MinMaxMode, PavingMode, PlotAxes, VarKind,
};
use crate::core::engine::{Engine, EngineResult};
use crate::core::error::DomainError;
use crate::core::number::{NumberLiteral, Numeral};

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub kind: VarKind,
    pub interval: Interval,
}

/// An expression with the let chain it was written under.
#[derive(Debug, Clone, PartialEq)]
pub struct Scoped<T> {
    pub value: T,
    pub env: Vec<LetBinding>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolverRequest {
    Pave,
    Bifurcation { equilibrium: bool },
    MinMax(MinMaxMode),
    Plot { name: String, axes: PlotAxes },
}

#[derive(Debug, Clone, Default)]
pub struct Problem {
    defaults: Settings,
    settings: Settings,
    name: String,
    variables: Vec<Variable>,
    constants: Vec<(String, Numeral)>,
    definitions: Vec<(String, Expr)>,
    objective: Option<Scoped<Expr>>,
    differentials: Vec<Scoped<Expr>>,
    constraints: Vec<Scoped<Constraint>>,
    variable_resolutions: Vec<(String, f64)>,
    pavings: Vec<String>,
    requests: Vec<SolverRequest>,
}

impl Problem {
    pub fn new(defaults: Settings) -> Self {
        Problem {
            settings: defaults.clone(),
            defaults,
            ..Default::default()
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }
    pub fn constants(&self) -> &[(String, Numeral)] {
        &self.constants
    }
    pub fn definitions(&self) -> &[(String, Expr)] {
        &self.definitions
    }
    pub fn objective(&self) -> Option<&Scoped<Expr>> {
        self.objective.as_ref()
    }
    pub fn differentials(&self) -> &[Scoped<Expr>] {
        &self.differentials
    }
    pub fn constraints(&self) -> &[Scoped<Constraint>] {
        &self.constraints
    }
    pub fn requests(&self) -> &[SolverRequest] {
        &self.requests
    }
    pub fn pavings(&self) -> &[String] {
        &self.pavings
    }

    pub fn variable_resolution(&self, name: &str) -> Option<f64> {
        self.variable_resolutions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| *r)
    }

    /// One line per accumulated item, for the shell's status output.
    pub fn summary(&self) -> String {
        format!(
            "{} variable(s), {} constraint(s), {} differential equation(s), objective {}",
            self.variables.len(),
            self.constraints.len(),
            self.differentials.len(),
            if self.objective.is_some() { "set" } else { "unset" }
        )
    }

    fn is_declared(&self, name: &str) -> bool {
        self.variables.iter().any(|v| v.name == name)
            || self.constants.iter().any(|(n, _)| n == name)
            || self.definitions.iter().any(|(n, _)| n == name)
    }

    fn ensure_fresh(&self, name: &str) -> EngineResult {
        if self.is_declared(name) {
            return Err(DomainError::new(format!("'{}' is already declared", name)));
        }
        Ok(())
    }

    fn check_expr(&self, expr: &Expr, bound: &[&str]) -> EngineResult {
        for ident in expr.identifiers() {
            if !self.is_declared(ident) && !bound.contains(&ident) {
                return Err(DomainError::new(format!("unknown identifier '{}'", ident)));
            }
        }
        Ok(())
    }

    // Each binding sees the names bound before it; `expr` sees all of them.
    fn check_scoped(&self, expr: &Expr, env: &[LetBinding]) -> EngineResult {
        let mut bound: Vec<&str> = Vec::with_capacity(env.len());
        for binding in env {
            self.check_expr(&binding.expr, &bound)?;
            bound.push(&binding.name);
        }
        self.check_expr(expr, &bound)
    }

    fn require_variables(&self, action: &str) -> EngineResult {
        if self.variables.iter().any(|v| v.kind == VarKind::Variable) {
            Ok(())
        } else {
            Err(DomainError::new(format!("{}: no variables declared", action)))
        }
    }
}

fn integer_setting(what: &str, value: NumberLiteral) -> Result<i64, DomainError> {
    value
        .as_integer()
        .ok_or_else(|| DomainError::new(format!("{} must be an integer, got {}", what, value)))
}

fn non_negative(what: &str, value: NumberLiteral) -> Result<f64, DomainError> {
    let v = value.as_f64();
    if v < 0.0 {
        return Err(DomainError::new(format!("{} must not be negative, got {}", what, value)));
    }
    Ok(v)
}

impl Engine for Problem {
    fn is_safe_input(&self) -> bool {
        self.settings.safe_input
    }

    fn declare_variable(&mut self, name: &str, interval: &Interval, kind: VarKind) -> EngineResult {
        debug_log!("[engine] declare {:?} {} in {}", kind, name, interval);
        self.ensure_fresh(name)?;
        self.check_expr(&interval.lower, &[])?;
        self.check_expr(&interval.upper, &[])?;
        if let (Some(lb), Some(ub)) = (interval.lower.literal_value(), interval.upper.literal_value()) {
            if lb > ub {
                return Err(DomainError::new(format!(
                    "empty interval for '{}': lower bound {} exceeds upper bound {}",
                    name, lb, ub
                )));
            }
        }
        self.variables.push(Variable {
            name: name.to_string(),
            kind,
            interval: interval.clone(),
        });
        Ok(())
    }

    fn declare_constant(&mut self, name: &str, value: &Numeral) -> EngineResult {
        debug_log!("[engine] const {} = {}", name, value);
        self.ensure_fresh(name)?;
        self.constants.push((name.to_string(), value.clone()));
        Ok(())
    }

    fn define(&mut self, name: &str, expr: &Expr) -> EngineResult {
        debug_log!("[engine] define {} = {}", name, expr);
        self.ensure_fresh(name)?;
        self.check_expr(expr, &[])?;
        self.definitions.push((name.to_string(), expr.clone()));
        Ok(())
    }

    fn set_objective(&mut self, expr: &Expr, env: &[LetBinding]) -> EngineResult {
        debug_log!("[engine] objective {}", expr);
        self.check_scoped(expr, env)?;
        self.objective = Some(Scoped {
            value: expr.clone(),
            env: env.to_vec(),
        });
        Ok(())
    }

    fn set_differential(&mut self, expr: &Expr, env: &[LetBinding]) -> EngineResult {
        debug_log!("[engine] dfeq {}", expr);
        self.check_scoped(expr, env)?;
        self.differentials.push(Scoped {
            value: expr.clone(),
            env: env.to_vec(),
        });
        Ok(())
    }

    fn add_constraint(&mut self, constraint: &Constraint, env: &[LetBinding]) -> EngineResult {
        debug_log!("[engine] cnstr {}", constraint);
        self.check_scoped(&constraint.expr, env)?;
        self.constraints.push(Scoped {
            value: constraint.clone(),
            env: env.to_vec(),
        });
        Ok(())
    }

    fn set_precision(&mut self, value: &Numeral) -> EngineResult {
        let precision = match value.literal() {
            Some(n) => integer_setting("precision", n)?,
            None => return Err(DomainError::new(format!("precision must be an integer, got {}", value))),
        };
        debug_log!("[engine] precision = {}", precision);
        self.settings.precision = precision;
        Ok(())
    }

    fn set_resolution(&mut self, value: NumberLiteral) -> EngineResult {
        self.settings.resolution = non_negative("resolution", value)?;
        Ok(())
    }

    fn set_variable_resolution(&mut self, name: &str, value: NumberLiteral) -> EngineResult {
        if !self.variables.iter().any(|v| v.name == name) {
            return Err(DomainError::new(format!("resolution for undeclared variable '{}'", name)));
        }
        let r = non_negative("resolution", value)?;
        match self.variable_resolutions.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = r,
            None => self.variable_resolutions.push((name.to_string(), r)),
        }
        Ok(())
    }

    fn set_granularity(&mut self, value: NumberLiteral) -> EngineResult {
        self.settings.granularity = non_negative("granularity", value)?;
        Ok(())
    }

    fn set_depth(&mut self, value: NumberLiteral) -> EngineResult {
        let depth = integer_setting("depth", value)?;
        if depth < 0 {
            return Err(DomainError::new(format!("depth must not be negative, got {}", depth)));
        }
        self.settings.depth = depth;
        Ok(())
    }

    fn set_var_select(&mut self, value: NumberLiteral) -> EngineResult {
        self.settings.var_select = integer_setting("varselect", value)?;
        Ok(())
    }

    fn set_bp(&mut self, value: bool) -> EngineResult {
        self.settings.bp = value;
        Ok(())
    }

    fn set_safe_input(&mut self, value: bool) -> EngineResult {
        debug_log!("[engine] safe input = {}", value);
        self.settings.safe_input = value;
        Ok(())
    }

    fn set_debug(&mut self, value: bool) -> EngineResult {
        self.settings.debug = value;
        Ok(())
    }

    fn set_name(&mut self, name: &str) -> EngineResult {
        self.name = name.to_string();
        Ok(())
    }

    fn set_output(&mut self, file: &str) -> EngineResult {
        debug_log!("[engine] output = {:?}", file);
        self.settings.output = file.to_string();
        Ok(())
    }

    fn set_paving_mode(&mut self, mode: PavingMode) -> EngineResult {
        self.settings.paving_mode = mode;
        Ok(())
    }

    fn pave(&mut self) -> EngineResult {
        self.require_variables("pave")?;
        debug_log!("[engine] pave: {}", self.summary());
        self.requests.push(SolverRequest::Pave);
        Ok(())
    }

    fn bifurcation(&mut self, equilibrium: bool) -> EngineResult {
        let action = if equilibrium { "equilibrium" } else { "bifurcation" };
        self.require_variables(action)?;
        if self.differentials.is_empty() {
            return Err(DomainError::new(format!("{}: no differential equations given", action)));
        }
        self.requests.push(SolverRequest::Bifurcation { equilibrium });
        Ok(())
    }

    fn minmax(&mut self, mode: MinMaxMode) -> EngineResult {
        self.require_variables("minmax")?;
        if self.objective.is_none() {
            return Err(DomainError::new("minmax: no objective function given"));
        }
        self.requests.push(SolverRequest::MinMax(mode));
        Ok(())
    }

    fn save_paving(&mut self, name: &str) -> EngineResult {
        if !self.pavings.iter().any(|p| p == name) {
            self.pavings.push(name.to_string());
        }
        Ok(())
    }

    fn load_paving(&mut self, name: &str) -> EngineResult {
        if !self.pavings.iter().any(|p| p == name) {
            return Err(DomainError::new(format!("no saved paving named '{}'", name)));
        }
        Ok(())
    }

    fn plot(&mut self, name: &str, axes: &PlotAxes) -> EngineResult {
        for axis in axes.names() {
            if !self.variables.iter().any(|v| v.name == axis) {
                return Err(DomainError::new(format!("plot axis '{}' is not a declared variable", axis)));
            }
        }
        self.requests.push(SolverRequest::Plot {
            name: name.to_string(),
            axes: axes.clone(),
        });
        Ok(())
    }

    fn reset_session(&mut self) {
        debug_log!("[engine] reset session");
        *self = Problem::new(self.defaults.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ast::CmpOp;

    fn unit() -> Interval {
        Interval {
            lower: Expr::int(0),
            upper: Expr::int(1),
        }
    }

    #[test]
    fn duplicate_declaration_fails() {
        let mut p = Problem::default();
        p.declare_variable("x", &unit(), VarKind::Variable).unwrap();
        let err = p
            .declare_constant("x", &NumberLiteral::Integer(1).into())
            .unwrap_err();
        assert_eq!(err.message, "'x' is already declared");
    }

    #[test]
    fn inverted_literal_interval_fails() {
        let mut p = Problem::default();
        let iv = Interval {
            lower: Expr::int(3),
            upper: Expr::neg(Expr::int(1)),
        };
        assert!(p.declare_variable("x", &iv, VarKind::Variable).is_err());
    }

    #[test]
    fn let_bindings_scope_the_constraint() {
        let mut p = Problem::default();
        p.declare_variable("x", &unit(), VarKind::Variable).unwrap();
        let env = vec![LetBinding {
            name: "t".into(),
            expr: Expr::ident("x"),
        }];
        let c = Constraint::normalize(Expr::ident("t"), CmpOp::Lt, Expr::int(1));
        p.add_constraint(&c, &env).unwrap();
        // `t` does not outlive its statement
        let err = p.add_constraint(&c, &[]).unwrap_err();
        assert_eq!(err.message, "unknown identifier 't'");
    }

    #[test]
    fn reset_restores_defaults() {
        let mut p = Problem::new(Settings {
            resolution: 0.5,
            ..Settings::default()
        });
        p.set_resolution(NumberLiteral::Real(0.1)).unwrap();
        p.declare_variable("x", &unit(), VarKind::Variable).unwrap();
        p.reset_session();
        assert_eq!(p.settings().resolution, 0.5);
        assert!(p.variables().is_empty());
    }

    #[test]
    fn precision_must_be_integer() {
        let mut p = Problem::default();
        assert!(p.set_precision(&NumberLiteral::Real(2.5).into()).is_err());
        p.set_precision(&NumberLiteral::Integer(-4).into()).unwrap();
        assert_eq!(p.settings().precision, -4);
    }
}
