//! Tree-walking evaluator.
//!
//! Evaluation never fails: unknown variables and functions read as `0.0`,
//! and `/` or `%` by zero yield `0.0`. Nothing here allocates.

use super::ast::*;
use super::builtin::{buffer_index, MAX_ARGS};
use super::env::Environment;
use super::token::Operator;

/// Run every statement of `program` in order.
pub fn run(program: &Program, env: &mut Environment) {
    for statement in program.statements() {
        exec(statement, env);
    }
}

pub fn exec(statement: &Statement, env: &mut Environment) {
    match statement {
        Statement::Assign(name, expr) => {
            let value = eval(expr, env);
            env.set_name(name, value);
        }
        Statement::Expr(expr) => {
            eval(expr, env);
        }
    }
}

pub fn eval(expr: &Expr, env: &mut Environment) -> f64 {
    match expr {
        Expr::Const(v) => *v,
        Expr::Var(name) => env.get_name(name),
        Expr::Unary(op, e) => {
            let v = eval(e, env);
            match op {
                UnaryOp::Neg => -v,
                UnaryOp::Plus => v,
                UnaryOp::Not => truth(v == 0.0),
            }
        }
        Expr::Binary(op, l, r) => binary(*op, l, r, env),
        Expr::Call(call) => {
            let Some(func) = call.func else {
                return 0.0;
            };
            let mut args = [0.0; MAX_ARGS];
            let argc = call.args.len().min(MAX_ARGS);
            for (slot, arg) in args.iter_mut().zip(&call.args) {
                *slot = eval(arg, env);
            }
            func.apply(&args[..argc], env)
        }
        Expr::Assign(target, value) => assign(target, value, env),
    }
}

fn binary(op: Operator, l: &Expr, r: &Expr, env: &mut Environment) -> f64 {
    use Operator::*;
    match op {
        And => {
            if eval(l, env) == 0.0 {
                return 0.0;
            }
            return truth(eval(r, env) != 0.0);
        }
        Or => {
            if eval(l, env) != 0.0 {
                return 1.0;
            }
            return truth(eval(r, env) != 0.0);
        }
        _ => {}
    }

    let a = eval(l, env);
    let b = eval(r, env);
    match op {
        Plus => a + b,
        Minus => a - b,
        Star => a * b,
        Slash => {
            if b == 0.0 {
                0.0
            } else {
                a / b
            }
        }
        Percent => {
            if b == 0.0 {
                0.0
            } else {
                a % b
            }
        }
        Caret => a.powf(b),
        Eq => truth(a == b),
        NotEq => truth(a != b),
        Less => truth(a < b),
        LessEq => truth(a <= b),
        Greater => truth(a > b),
        GreaterEq => truth(a >= b),
        // Prefix-only, or handled above.
        Not | And | Or => 0.0,
    }
}

/// Write `value` into `target`. The target's index is evaluated first.
fn assign(target: &LValue, value: &Expr, env: &mut Environment) -> f64 {
    match target {
        LValue::Var(name) => {
            let v = eval(value, env);
            env.set_name(name, v);
            v
        }
        LValue::Megabuf(index) => {
            let i = buffer_index(eval(index, env));
            let v = eval(value, env);
            env.local_mut().set(i, v);
            v
        }
        LValue::Gmegabuf(index) => {
            let i = buffer_index(eval(index, env));
            let v = eval(value, env);
            env.global().set(i, v);
            v
        }
        LValue::Discard(expr) => {
            eval(expr, env);
            eval(value, env)
        }
    }
}

fn truth(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::super::Compiler;
    use super::*;
    use crate::vm::GlobalBuffer;
    use assert_approx_eq::assert_approx_eq;

    fn run_src(src: &str) -> Environment {
        let mut env = Environment::new(GlobalBuffer::new(), 1);
        run(&Compiler::compile(src).program, &mut env);
        env
    }

    fn value_of(src: &str) -> f64 {
        run_src(&format!("r = {src}")).get("r", f64::NAN)
    }

    #[test]
    fn arithmetic_and_precedence() {
        assert_eq!(value_of("5"), 5.0);
        assert_eq!(value_of("2+3*4"), 14.0);
        assert_eq!(value_of("(2+3)*4"), 20.0);
        assert_eq!(value_of("7 % 4"), 3.0);
        assert_eq!(value_of("10 - 4 - 3"), 3.0);
        assert_eq!(value_of("2^3^2"), 64.0);
        assert_eq!(value_of("-2^2"), 4.0);
    }

    #[test]
    fn division_by_zero_is_zero() {
        assert_eq!(value_of("1/0"), 0.0);
        assert_eq!(value_of("5%0"), 0.0);
    }

    #[test]
    fn comparison_and_logic() {
        assert_eq!(value_of("3 > 2"), 1.0);
        assert_eq!(value_of("3 <= 2"), 0.0);
        assert_eq!(value_of("2 == 2 && 1 != 0"), 1.0);
        assert_eq!(value_of("0 || 0"), 0.0);
        assert_eq!(value_of("0.5 || 0"), 1.0);
        assert_eq!(value_of("!0"), 1.0);
        assert_eq!(value_of("!3"), 0.0);
    }

    #[test]
    fn logic_short_circuits() {
        let env = run_src("0 && assign(a, 1); 1 || assign(b, 1)");
        assert!(!env.contains("a"));
        assert!(!env.contains("b"));
    }

    #[test]
    fn unknown_names_read_zero() {
        assert_eq!(value_of("nothing_here + 1"), 1.0);
        assert_eq!(value_of("wobble(3) + 2"), 2.0);
    }

    #[test]
    fn malformed_literal_reads_zero() {
        assert_eq!(value_of("1.2.3 + 1"), 1.0);
    }

    #[test]
    fn builtins_through_scripts() {
        assert_approx_eq!(value_of("sin(2)"), 2f64.sin());
        assert_approx_eq!(value_of("atan2(1, 1)"), std::f64::consts::FRAC_PI_4);
        assert_eq!(value_of("clamp(7, 0, 5)"), 5.0);
        assert_eq!(value_of("lerp(0, 10, 0.5)"), 5.0);
        assert_eq!(value_of("pow(2, 10)"), 1024.0);
    }

    #[test]
    fn variables_are_case_insensitive() {
        let env = run_src("X=5; y = x + 1");
        assert_eq!(env.get("x", 0.0), 5.0);
        assert_eq!(env.get("Y", 0.0), 6.0);
    }

    #[test]
    fn assign_writes_local_buffer() {
        let env = run_src("assign(megabuf(3), 7); y = megabuf(3)");
        assert_eq!(env.get("y", 0.0), 7.0);
        assert_eq!(env.local().get(3), 7.0);
    }

    #[test]
    fn assign_value_reading_buffer_keeps_target() {
        let env = run_src(
            "assign(megabuf(1), 10); assign(megabuf(2), megabuf(1) + 1); a = megabuf(1); b = megabuf(2)",
        );
        assert_eq!(env.get("a", 0.0), 10.0);
        assert_eq!(env.get("b", 0.0), 11.0);
    }

    #[test]
    fn assign_returns_written_value() {
        let env = run_src("z = assign(gmegabuf(-4.7), 2.5)");
        assert_eq!(env.get("z", 0.0), 2.5);
        assert_eq!(env.global().get(-4), 2.5);
    }

    #[test]
    fn assign_to_variable() {
        let env = run_src("assign(Q, 3); r = q");
        assert_eq!(env.get("r", 0.0), 3.0);
    }

    #[test]
    fn extra_call_arguments_are_ignored() {
        assert_eq!(value_of("min(4, 2, 9, assign(k, 1))"), 2.0);
        let env = run_src("m = min(4, 2, 9, assign(k, 1))");
        assert!(!env.contains("k"));
    }
}
