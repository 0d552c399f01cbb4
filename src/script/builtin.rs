//! Built-in functions callable from scripts.
//!
//! Names are resolved to a [`Builtin`] once, at parse time, so the
//! evaluator dispatches with a single `match` and no string lookups.
//! `assign` is not listed here: the parser turns it into
//! [`Expr::Assign`](super::ast::Expr::Assign).

use rand::Rng;

use super::env::Environment;

/// Maximum number of arguments any built-in reads.
pub const MAX_ARGS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sqrt,
    Abs,
    Floor,
    Ceil,
    Pow,
    Exp,
    Log,
    Log10,
    Min,
    Max,
    Clamp,
    Sign,
    Lerp,
    Frac,
    Rand,
    Megabuf,
    Gmegabuf,
}

impl Builtin {
    /// Resolve a lowercase function name.
    pub fn from_name(name: &str) -> Option<Builtin> {
        use Builtin::*;
        let builtin = match name {
            "sin" => Sin,
            "cos" => Cos,
            "tan" => Tan,
            "asin" => Asin,
            "acos" => Acos,
            "atan" => Atan,
            "atan2" => Atan2,
            "sqrt" => Sqrt,
            "abs" => Abs,
            "floor" => Floor,
            "ceil" => Ceil,
            "pow" => Pow,
            "exp" => Exp,
            "log" => Log,
            "log10" => Log10,
            "min" => Min,
            "max" => Max,
            "clamp" => Clamp,
            "sign" => Sign,
            "lerp" => Lerp,
            "frac" => Frac,
            "rand" => Rand,
            "megabuf" => Megabuf,
            "gmegabuf" => Gmegabuf,
            _ => return None,
        };
        Some(builtin)
    }

    /// Apply the function. `args` holds the evaluated arguments, at most
    /// [`MAX_ARGS`] of them; any the script left out read as `0.0`.
    pub fn apply(self, args: &[f64], env: &mut Environment) -> f64 {
        use Builtin::*;
        let arg = |i: usize| args.get(i).copied().unwrap_or(0.0);
        let (a, b, c) = (arg(0), arg(1), arg(2));
        match self {
            Sin => a.sin(),
            Cos => a.cos(),
            Tan => a.tan(),
            Asin => a.asin(),
            Acos => a.acos(),
            Atan => a.atan(),
            Atan2 => a.atan2(b),
            Sqrt => a.sqrt(),
            Abs => a.abs(),
            Floor => a.floor(),
            Ceil => a.ceil(),
            Pow => a.powf(b),
            Exp => a.exp(),
            Log => a.ln(),
            Log10 => a.log10(),
            Min => a.min(b),
            Max => a.max(b),
            Clamp => a.max(b).min(c),
            Sign => sign(a),
            Lerp => a + (b - a) * c,
            Frac => a - a.floor(),
            Rand => {
                let u: f64 = env.rng().gen();
                match args.len() {
                    0 => u,
                    1 => u * a,
                    _ => a + (b - a) * u,
                }
            }
            Megabuf => env.local().get(buffer_index(a)),
            Gmegabuf => env.global().get(buffer_index(a)),
        }
    }
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Convert a script value to a buffer address, truncating toward zero.
pub fn buffer_index(value: f64) -> i64 {
    value as i64
}
