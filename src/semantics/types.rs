use super::Analyzer;
use crate::ast::TypeAnn;
use crate::scope::SymbolKind;

impl<'a, 'int, 'sink> Analyzer<'a, 'int, 'sink> {
    pub(crate) fn is_any(&self, ty: &TypeAnn<'a>) -> bool {
        matches!(ty, TypeAnn::Named { name, .. } if *name == self.sym_any)
    }

    pub(crate) fn is_number(&self, ty: &TypeAnn<'a>) -> bool {
        matches!(ty, TypeAnn::Named { name, .. } if *name == self.sym_number)
    }

    pub(crate) fn is_string(&self, ty: &TypeAnn<'a>) -> bool {
        matches!(ty, TypeAnn::Named { name, .. } if *name == self.sym_string)
    }

    pub(crate) fn is_boolean(&self, ty: &TypeAnn<'a>) -> bool {
        matches!(ty, TypeAnn::Named { name, .. } if *name == self.sym_boolean)
    }

    pub(crate) fn is_void(&self, ty: &TypeAnn<'a>) -> bool {
        matches!(ty, TypeAnn::Named { name, .. } if *name == self.sym_void)
    }

    fn is_null(&self, ty: &TypeAnn<'a>) -> bool {
        matches!(ty, TypeAnn::Named { name, .. } if *name == self.sym_null)
    }

    fn is_undefined(&self, ty: &TypeAnn<'a>) -> bool {
        matches!(ty, TypeAnn::Named { name, .. } if *name == self.sym_undefined)
    }

    fn is_primitive(&self, ty: &TypeAnn<'a>) -> bool {
        self.is_number(ty) || self.is_string(ty) || self.is_boolean(ty)
    }

    /// Is `source` assignable to `target`?
    pub fn assignable(&self, source: &TypeAnn<'a>, target: &TypeAnn<'a>) -> bool {
        if self.is_any(source) || self.is_any(target) {
            return true;
        }

        // Identical named types.
        if let (TypeAnn::Named { name: s, .. }, TypeAnn::Named { name: t, .. }) = (source, target)
        {
            if s == t {
                return true;
            }
        }

        // A union source must reach the target through every member; a
        // union target accepts any of its members. Both precede the
        // null/undefined fallbacks so `undefined -> T | undefined` holds in
        // TypeScript mode.
        if let TypeAnn::Union { members, .. } = source {
            return members.iter().all(|m| self.assignable(m, target));
        }
        if let TypeAnn::Union { members, .. } = target {
            return members.iter().any(|m| self.assignable(source, m));
        }

        // An intersection source must satisfy the target through every
        // member.
        if let TypeAnn::Intersection { members, .. } = source {
            return members.iter().all(|m| self.assignable(m, target));
        }

        if self.is_null(source) {
            return !self.is_primitive(target);
        }
        if self.is_undefined(source) {
            return !self.is_typescript;
        }

        match (source, target) {
            (
                TypeAnn::Array { element: s, .. },
                TypeAnn::Array { element: t, .. },
            ) => self.assignable(s, t),

            // Structural: every required property of the target must appear
            // on the source with an assignable type.
            (TypeAnn::Object { props: sp, .. }, TypeAnn::Object { props: tp, .. }) => {
                tp.iter().filter(|p| !p.optional).all(|tprop| {
                    sp.iter()
                        .any(|sprop| sprop.name == tprop.name && self.assignable(sprop.ty, tprop.ty))
                })
            }

            // Same arity, contravariant parameters, covariant return.
            (
                TypeAnn::Function {
                    params: sp,
                    ret: sr,
                    ..
                },
                TypeAnn::Function {
                    params: tp,
                    ret: tr,
                    ..
                },
            ) => {
                sp.len() == tp.len()
                    && sp
                        .iter()
                        .zip(tp.iter())
                        .all(|(s, t)| self.assignable(t, s))
                    && self.assignable(sr, tr)
            }

            (
                TypeAnn::Generic {
                    base: sb, args: sa, ..
                },
                TypeAnn::Generic {
                    base: tb, args: ta, ..
                },
            ) => {
                sb == tb
                    && sa.len() == ta.len()
                    && sa.iter().zip(ta.iter()).all(|(s, t)| self.assignable(s, t))
            }

            _ => false,
        }
    }

    /// Human-readable type for diagnostics.
    pub fn type_display(&self, ty: &TypeAnn<'a>) -> String {
        match ty {
            TypeAnn::Named { name, .. } => self.interner.resolve(*name).to_string(),
            TypeAnn::Array { element, .. } => {
                let inner = self.type_display(element);
                match element {
                    TypeAnn::Union { .. }
                    | TypeAnn::Intersection { .. }
                    | TypeAnn::Function { .. } => format!("({})[]", inner),
                    _ => format!("{}[]", inner),
                }
            }
            TypeAnn::Function { params, ret, .. } => {
                let params: Vec<String> = params.iter().map(|p| self.type_display(p)).collect();
                format!("({}) => {}", params.join(", "), self.type_display(ret))
            }
            TypeAnn::Object { props, .. } => {
                if props.is_empty() {
                    return "{}".to_string();
                }
                let props: Vec<String> = props
                    .iter()
                    .map(|p| {
                        format!(
                            "{}{}: {}",
                            self.interner.resolve(p.name),
                            if p.optional { "?" } else { "" },
                            self.type_display(p.ty)
                        )
                    })
                    .collect();
                format!("{{ {} }}", props.join("; "))
            }
            TypeAnn::Union { members, .. } => {
                let members: Vec<String> = members.iter().map(|m| self.type_display(m)).collect();
                members.join(" | ")
            }
            TypeAnn::Intersection { members, .. } => {
                let members: Vec<String> = members.iter().map(|m| self.type_display(m)).collect();
                members.join(" & ")
            }
            TypeAnn::Generic { base, args, .. } => {
                let args: Vec<String> = args.iter().map(|a| self.type_display(a)).collect();
                format!("{}<{}>", self.interner.resolve(*base), args.join(", "))
            }
        }
    }

    /// Well-formedness of a written annotation: every named type must refer
    /// to a type.
    pub(crate) fn check_type(&mut self, ty: &'a TypeAnn<'a>) {
        match ty {
            TypeAnn::Named { name, span } => {
                match self.scopes.resolve(*name).map(|e| e.kind) {
                    Some(SymbolKind::BuiltinType)
                    | Some(SymbolKind::Class(_))
                    | Some(SymbolKind::Interface(_)) => {}
                    None => {
                        let message =
                            format!("Cannot find name '{}'", self.interner.resolve(*name));
                        self.sink.report(*span, message);
                    }
                    Some(_) => {
                        let message = format!(
                            "'{}' refers to a value, but is being used as a type",
                            self.interner.resolve(*name)
                        );
                        self.sink.report(*span, message);
                    }
                }
            }
            TypeAnn::Array { element, .. } => self.check_type(element),
            TypeAnn::Function { params, ret, .. } => {
                for param in params {
                    self.check_type(param);
                }
                self.check_type(ret);
            }
            TypeAnn::Object { props, .. } => {
                for prop in props {
                    self.check_type(prop.ty);
                }
            }
            TypeAnn::Union { members, .. } | TypeAnn::Intersection { members, .. } => {
                for member in members {
                    self.check_type(member);
                }
            }
            TypeAnn::Generic { base, args, span } => {
                match self.scopes.resolve(*base).map(|e| e.kind) {
                    Some(SymbolKind::BuiltinType)
                    | Some(SymbolKind::Class(_))
                    | Some(SymbolKind::Interface(_))
                    | Some(SymbolKind::BuiltinValue) => {}
                    None => {
                        let message =
                            format!("Cannot find name '{}'", self.interner.resolve(*base));
                        self.sink.report(*span, message);
                    }
                    Some(_) => {
                        let message = format!(
                            "'{}' refers to a value, but is being used as a type",
                            self.interner.resolve(*base)
                        );
                        self.sink.report(*span, message);
                    }
                }
                for arg in args {
                    self.check_type(arg);
                }
            }
        }
    }
}
