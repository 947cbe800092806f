mod expr;
mod stmt;
mod types;

pub use expr::{AssignOp, BinaryOp, Expr, Literal, ObjectProperty, UnaryOp};
pub use stmt::{
    Access, ClassDecl, ClassMember, ExportKind, Function, ImportSpecifier, InterfaceDecl,
    InterfaceMember, Param, Program, Stmt, VarKind,
};
pub use types::{ObjectTypeProp, TypeAnn};
