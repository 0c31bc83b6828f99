//! Typed content-stream operators
//!
//! Only the handful of path and graphics-state operators needed to paint
//! strokes are modelled. Each variant fixes its operand count, so lowering to
//! an [`Operation`] always produces a well-formed instruction.

use lopdf::content::Operation;
use lopdf::Object;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    /// `q`
    SaveState,
    /// `Q`
    RestoreState,
    /// `r g b RG`
    SetStrokeRgb(f32, f32, f32),
    /// `w`
    SetLineWidth(f32),
    /// `x y m`
    MoveTo(f32, f32),
    /// `x y l`
    LineTo(f32, f32),
    /// `S`
    StrokePath,
}

impl PathOp {
    pub fn operator(&self) -> &'static str {
        match self {
            PathOp::SaveState => "q",
            PathOp::RestoreState => "Q",
            PathOp::SetStrokeRgb(..) => "RG",
            PathOp::SetLineWidth(_) => "w",
            PathOp::MoveTo(..) => "m",
            PathOp::LineTo(..) => "l",
            PathOp::StrokePath => "S",
        }
    }

    pub fn operands(&self) -> Vec<f32> {
        match *self {
            PathOp::SaveState | PathOp::RestoreState | PathOp::StrokePath => vec![],
            PathOp::SetStrokeRgb(r, g, b) => vec![r, g, b],
            PathOp::SetLineWidth(w) => vec![w],
            PathOp::MoveTo(x, y) | PathOp::LineTo(x, y) => vec![x, y],
        }
    }

    pub fn to_operation(&self) -> Operation {
        Operation::new(
            self.operator(),
            self.operands().into_iter().map(Object::Real).collect(),
        )
    }

    /// Read a decoded operation back into the typed model.
    ///
    /// Returns `None` for any other opcode, or when the operand list does not
    /// match the opcode's arity.
    pub fn parse(op: &Operation) -> Option<PathOp> {
        let nums: Option<Vec<f32>> = op.operands.iter().map(number).collect();
        let nums = nums?;

        match (op.operator.as_str(), nums.as_slice()) {
            ("q", []) => Some(PathOp::SaveState),
            ("Q", []) => Some(PathOp::RestoreState),
            ("RG", &[r, g, b]) => Some(PathOp::SetStrokeRgb(r, g, b)),
            ("w", &[w]) => Some(PathOp::SetLineWidth(w)),
            ("m", &[x, y]) => Some(PathOp::MoveTo(x, y)),
            ("l", &[x, y]) => Some(PathOp::LineTo(x, y)),
            ("S", []) => Some(PathOp::StrokePath),
            _ => None,
        }
    }
}

impl From<PathOp> for Operation {
    fn from(op: PathOp) -> Self {
        op.to_operation()
    }
}

/// Numeric operand as f32. Content parsers decode whole numbers as integers.
fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
