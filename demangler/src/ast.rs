//! The demangled symbol tree.
//!
//! A single recursive record covers every role a node can play: top-level
//! symbol, name fragment, type, template parameter payload.  Which fields
//! are meaningful is driven by [`SymbolType`], [`Code`] and the boolean
//! flags.  Nodes are built by the decoder and never mutated afterwards; the
//! decoder's back-reference stacks hold cloned snapshots, so resolving a
//! back-reference can never observe later growth of the canonical tree.

use crate::codes::Code;

/// What kind of entity a top-level symbol describes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SymbolType {
    #[default]
    Unspecified,
    StaticClassMember,
    GlobalObject,
    GlobalFunction,
    ClassMethod,
    Rtti,
    VTable,
    String,
    VtorDisp,
    StaticGuard,
    MethodThunk,
    HexSymbol,
}

/// Member access of a class method or static member.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    #[default]
    Unspecified,
    Private,
    Protected,
    Public,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MethodProperty {
    #[default]
    Unspecified,
    Ordinary,
    Static,
    Virtual,
    Thunk,
}

/// Pointer reach.  `Huge` is allocated but never produced by the decoder.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Distance {
    #[default]
    Unspecified,
    Near,
    Far,
    Huge,
}

/// A template parameter is either a type, a plain integer constant, or a
/// constant pointer to a symbol.  Function and member pointer constants
/// carry their one or two trailing integers on the inner symbol's `n`.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateParameter {
    Type(SymbolTree),
    Constant(i64),
    Pointer(SymbolTree),
}

/// One node of the demangled tree.
///
/// `name` holds a fully-qualified name in innermost-to-outermost order: the
/// leaf identifier first, the outer namespaces last.  It is read
/// right-to-left at render time.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SymbolTree {
    pub symbol_type: SymbolType,
    pub simple_code: Code,
    /// Identifier text, meaningful iff `simple_code == Code::Undefined`.
    pub simple_string: String,

    pub is_const: bool,
    pub is_volatile: bool,
    pub is_pointer: bool,
    pub is_reference: bool,
    /// Rvalue reference.
    pub is_refref: bool,
    pub is_array: bool,
    pub dimensions: Vec<u64>,
    pub is_func: bool,
    pub is_member: bool,
    pub is_based: bool,
    /// A symbol appearing as a name fragment of another symbol.
    pub is_embedded: bool,
    /// Anonymous namespace; the generated hex identifier is kept in
    /// `simple_string`.
    pub is_anonymous: bool,
    pub is_ctor: bool,
    pub is_dtor: bool,
    pub is_gc: bool,
    pub is_pin: bool,
    pub unaligned: bool,
    pub restrict: bool,
    /// A count, not a flag: a `__ptr64` pointer may itself be `__ptr64`.
    pub ptr64: u8,
    pub extern_c: bool,
    pub is_exported: bool,
    pub distance: Distance,

    /// Pointee, referent, or array element wrapped by this declarator layer.
    pub inner_type: Option<Box<SymbolTree>>,
    /// Underlying integer type of an enum.
    pub enum_real_type: Option<Box<SymbolTree>>,
    /// Return type of a function, or the RTTI payload type.
    pub retval: Option<Box<SymbolTree>>,
    pub args: Vec<SymbolTree>,
    pub name: Vec<SymbolTree>,
    /// Name of the object or vtable instance; `name` then describes its type.
    pub instance_name: Vec<SymbolTree>,
    /// `for …` interface decorations on vtables.
    pub com_interface: Vec<SymbolTree>,
    /// A `None` entry is the null parameter produced by an ended pack.
    pub template_parameters: Vec<Option<TemplateParameter>>,
    /// Integers of the special forms: RTTI base-class tuple, thunk offsets,
    /// vtordisp offsets, string length, guard index.
    pub n: Vec<i64>,

    /// One of `__cdecl`, `__pascal`, `__thiscall`, `__stdcall`,
    /// `__fastcall`, `__clrcall`, `__unknown`; empty when unset.
    pub calling_convention: &'static str,
    pub scope: Scope,
    pub method_property: MethodProperty,
}

impl SymbolTree {
    /// A fragment holding a literal identifier.
    pub(crate) fn named(name: impl Into<String>) -> Self {
        SymbolTree {
            simple_string: name.into(),
            ..SymbolTree::default()
        }
    }

    /// A fragment holding a name code.
    pub(crate) fn coded(code: Code) -> Self {
        SymbolTree {
            simple_code: code,
            ..SymbolTree::default()
        }
    }

    /// True when the node carries no renderable content, like the return
    /// type of a constructor.
    pub fn is_empty_type(&self) -> bool {
        self.simple_code == Code::Undefined
            && self.simple_string.is_empty()
            && self.name.is_empty()
            && !self.is_pointer
            && !self.is_reference
            && !self.is_refref
            && !self.is_array
            && !self.is_func
    }
}
