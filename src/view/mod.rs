//! View vocabulary: nodes, modifiers, the `Ui` builder and tree diffing.

pub mod compose;
pub mod diff;
pub mod modifier;
pub mod node;

pub use compose::{AlertDialog, DialogButton, Ui};
pub use diff::{Patch, diff};
pub use modifier::{Edges, Modifier, ModifierElement, SizeRequest};
pub use node::{
    Alignment, Arrangement, CardStyle, DialogProps, Handler, ImageShape, ImageStyle, NodeKind,
    Stack, TextOverflow, TextStyle, ViewNode,
};
