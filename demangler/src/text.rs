//! Renders a [`SymbolTree`] back into C++ declaration text.
//!
//! Reconstructing a declaration from inside out is the awkward part of the C
//! declarator grammar: for a pointer to a function returning int, the name
//! sits in the middle (`int (*x)(int)`), so text cannot be produced by
//! simple left-to-right appending.  The walk is therefore split into a `pre`
//! half (everything left of the declarator name) and a `post` half
//! (everything right of it), and function and variable names are emitted
//! between the two halves of their own type.
//!
//! All output is filtered through a one-character-lookback writer that
//! collapses doubled spaces, guarantees a space between adjacent
//! identifier-legal characters, and optionally splits adjacent closing
//! template brackets.

use std::fmt::Write as _;

use crate::ast::{MethodProperty, Scope, SymbolTree, SymbolType, TemplateParameter};
use crate::attributes::Attributes;
use crate::codes::{code_string, Code};

/// Renders symbol trees under a fixed attribute set.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextOutput {
    attrs: Attributes,
}

impl TextOutput {
    pub fn new(attrs: Attributes) -> Self {
        TextOutput { attrs }
    }

    /// Render one symbol to a string.
    pub fn convert(&self, sym: &SymbolTree) -> String {
        let mut conv = Converter::new(self.attrs);
        conv.do_symbol(sym);
        conv.out
    }

    /// Render one symbol into a writer.
    pub fn write<W: std::fmt::Write>(&self, out: &mut W, sym: &SymbolTree) -> std::fmt::Result {
        out.write_str(&self.convert(sym))
    }

    /// The class portion of a function-shaped symbol's qualified name.
    pub fn class_name(&self, sym: &SymbolTree) -> String {
        if sym.name.len() < 2 {
            return String::new();
        }
        let mut conv = Converter::new(self.attrs);
        conv.retval = sym.retval.as_deref();
        conv.do_fqn(&sym.name[1..]);
        conv.out
    }

    /// The leaf of a function-shaped symbol's qualified name.
    pub fn method_name(&self, sym: &SymbolTree) -> String {
        if sym.name.is_empty() {
            return String::new();
        }
        let mut conv = Converter::new(self.attrs);
        conv.retval = sym.retval.as_deref();
        conv.do_fragment(&sym.name, 0);
        conv.out
    }

    /// The signature of a function-shaped symbol with the name omitted:
    /// scope, return type, calling convention, arguments, trailing
    /// qualifiers.
    pub fn method_signature(&self, sym: &SymbolTree) -> String {
        let mut conv = Converter::new(self.attrs);
        conv.do_function(sym, false);
        conv.out
    }
}

struct Converter<'t> {
    attrs: Attributes,
    out: String,
    sep_pending: bool,
    /// The active return type, consumed by `operator T` name fragments.
    retval: Option<&'t SymbolTree>,
    /// Set while rendering the target type of an `operator T` name; blocks
    /// the return-pointer cv discard.
    in_op_type: bool,
    /// Cleared to suppress calling conventions on bare function types in
    /// template parameters.
    do_cconv: bool,
    /// Cleared while spelling a ctor/dtor from its class fragment without
    /// class template parameters.
    template_params: bool,
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'t> Converter<'t> {
    fn new(attrs: Attributes) -> Self {
        Converter {
            attrs,
            out: String::new(),
            sep_pending: false,
            retval: None,
            in_op_type: false,
            do_cconv: true,
            template_params: true,
        }
    }

    // ------------------------------------------------------------------
    // Output discipline

    fn push(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        let first = s.chars().next().unwrap();
        let last = self.out.chars().next_back();
        if self.sep_pending {
            self.sep_pending = false;
            if last != Some(' ') && first != ' ' {
                self.out.push(' ');
            }
        } else if let Some(last) = last {
            if is_ident(last) && is_ident(first) {
                self.out.push(' ');
            } else if last == '>'
                && first == '>'
                && self.attrs.contains(Attributes::SPACE_BETWEEN_TEMPLATE_BRACKETS)
            {
                self.out.push(' ');
            }
        }
        self.out.push_str(s);
    }

    /// Soft break: the next push is separated by one space.
    fn sep(&mut self) {
        if !self.out.is_empty() {
            self.sep_pending = true;
        }
    }

    fn comma(&mut self) {
        if self.attrs.contains(Attributes::SPACE_AFTER_COMMA) {
            self.push(", ");
        } else {
            self.push(",");
        }
    }

    // ------------------------------------------------------------------
    // Symbols

    fn do_symbol(&mut self, sym: &'t SymbolTree) {
        match sym.symbol_type {
            SymbolType::GlobalFunction | SymbolType::ClassMethod | SymbolType::VtorDisp => {
                self.do_function(sym, true)
            }
            SymbolType::GlobalObject | SymbolType::StaticClassMember => self.do_variable(sym),
            SymbolType::VTable => self.do_vtable(sym),
            SymbolType::String => self.do_string(sym),
            SymbolType::Rtti => self.do_rtti(sym),
            SymbolType::StaticGuard => self.do_static_guard(sym),
            SymbolType::MethodThunk => self.do_method_thunk(sym),
            SymbolType::HexSymbol => self.push(&sym.simple_string),
            SymbolType::Unspecified => {
                // Trees from the '.' entry mode carry only a return type;
                // everything else renders as the type or name it is.
                if let Some(rv) = sym.retval.as_deref() {
                    self.do_type(rv);
                } else {
                    self.do_type(sym);
                }
            }
        }
    }

    fn do_function(&mut self, f: &'t SymbolTree, with_name: bool) {
        if f.method_property == MethodProperty::Thunk
            && self.attrs.contains(Attributes::OUTPUT_THUNKS)
        {
            self.push("[thunk]:");
            self.sep();
        }
        if f.extern_c && self.attrs.contains(Attributes::OUTPUT_EXTERN) {
            self.push("extern \"C\"");
            self.sep();
        }
        self.do_scope(f);
        match f.method_property {
            MethodProperty::Static => {
                self.push("static");
                self.sep();
            }
            MethodProperty::Virtual => {
                self.push("virtual");
                self.sep();
            }
            _ => {}
        }

        let saved_retval = self.retval;
        self.retval = f.retval.as_deref();

        // Conversion operators render their return type at the name site
        // instead.
        let conversion = f
            .name
            .first()
            .map(|leaf| leaf.simple_code == Code::OpType)
            .unwrap_or(false);

        let rv = self.retval.filter(|rv| !rv.is_empty_type() && !conversion);
        if let Some(rv) = rv {
            let discard = self.attrs.contains(Attributes::DISCARD_CV_ON_RETURN_POINTER)
                && !self.in_op_type
                && (rv.is_pointer || rv.is_reference || rv.is_refref);
            self.do_type_pre(rv, discard);
            self.sep();
        }

        if !f.calling_convention.is_empty() && self.do_cconv {
            self.push(f.calling_convention);
            self.sep();
        }
        self.do_distance(f);

        if with_name {
            self.do_fqn(&f.name);
            if f.symbol_type == SymbolType::VtorDisp && f.n.len() >= 2 {
                let mut marker = String::new();
                let _ = write!(marker, "`vtordisp{{{},{}}}'", f.n[0], f.n[1]);
                self.push(&marker);
                self.push(" ");
            } else if f.method_property == MethodProperty::Thunk && f.n.len() >= 2 {
                let mut marker = String::new();
                let _ = write!(marker, "`adjustor{{{}}}'", f.n[1]);
                self.push(&marker);
                self.push(" ");
            }
        }

        self.do_args(&f.args);
        self.do_trailing_qualifiers(f);

        if let Some(rv) = rv {
            self.do_type_post(rv);
        }
        self.retval = saved_retval;
    }

    fn do_variable(&mut self, sym: &'t SymbolTree) {
        if sym.symbol_type == SymbolType::StaticClassMember {
            self.do_scope(sym);
            self.push("static");
            self.sep();
        }
        self.do_type_pre(sym, false);
        self.sep();
        self.do_fqn(&sym.instance_name);
        self.do_type_post(sym);
    }

    fn do_vtable(&mut self, sym: &'t SymbolTree) {
        self.do_cv_prefix(sym);
        self.do_fqn(&sym.instance_name);
        if !sym.com_interface.is_empty() {
            self.push("{for ");
            for (i, iface) in sym.com_interface.iter().enumerate() {
                if i > 0 {
                    self.push("s ");
                }
                self.push("`");
                self.do_fqn(&iface.name);
                self.push("'");
            }
            self.push("}");
        }
    }

    fn do_string(&mut self, sym: &'t SymbolTree) {
        if !self.attrs.contains(Attributes::VERBOSE_CONSTANT_STRING) {
            self.push(&sym.simple_string);
            return;
        }
        self.push("const");
        self.sep();
        if let Some(elem) = sym.inner_type.as_deref() {
            self.do_type_pre(elem, false);
        }
        let mut dim = String::new();
        let _ = write!(dim, "[{}]", sym.n.first().copied().unwrap_or(0) + 1);
        self.push(&dim);
        self.sep();
        self.push("=");
        self.sep();
        if let Some(payload) = sym.name.first() {
            let quoted = quote_string(&payload.simple_string);
            self.push(&quoted);
        }
    }

    fn do_rtti(&mut self, sym: &'t SymbolTree) {
        if let Some(rv) = sym.retval.as_deref() {
            if !rv.is_empty_type() {
                self.do_type(rv);
                self.sep();
            }
        }
        self.do_fqn(&sym.name);
    }

    fn do_static_guard(&mut self, sym: &'t SymbolTree) {
        self.do_fqn(&sym.name);
        let mut brace = String::new();
        let _ = write!(brace, "{{{}}}", sym.n.first().copied().unwrap_or(0));
        self.push(&brace);
        if self.attrs.contains(Attributes::BROKEN_UNDNAME) {
            // undname prints a stray quote after the guard number.
            self.push("'");
        }
    }

    fn do_method_thunk(&mut self, sym: &'t SymbolTree) {
        if self.attrs.contains(Attributes::OUTPUT_THUNKS) {
            self.push("[thunk]:");
            self.sep();
        }
        if !sym.calling_convention.is_empty() {
            self.push(sym.calling_convention);
            self.sep();
        }
        self.do_fqn(&sym.name);
        let mut brace = String::new();
        let _ = write!(brace, "{{{},{{flat}}}}", sym.n.first().copied().unwrap_or(0));
        self.push(&brace);
        if self.attrs.contains(Attributes::BROKEN_UNDNAME) {
            // undname emits garbage after flat vcall thunks.
            self.push(" }'");
        }
    }

    // ------------------------------------------------------------------
    // Qualified names

    fn do_fqn(&mut self, name: &'t [SymbolTree]) {
        if name.is_empty() {
            return;
        }
        // Dynamic initializer and atexit destructor leaves wrap the rest of
        // the name instead of joining it.
        let leaf = &name[0];
        if name.len() > 1 {
            let label = match leaf.simple_code {
                Code::DynamicInitializer => Some("`dynamic initializer for '"),
                Code::DynamicAtexitDtor => Some("`dynamic atexit destructor for '"),
                _ => None,
            };
            if let Some(label) = label {
                self.push(label);
                self.do_fqn(&name[1..]);
                self.push("''");
                return;
            }
        }
        for i in (0..name.len()).rev() {
            if i != name.len() - 1 {
                self.push("::");
            }
            self.do_fragment(name, i);
        }
    }

    /// Render the fragment at position `i` of a name, with access to its
    /// neighbors (ctors and dtors draw their spelling from the enclosing
    /// class fragment).
    fn do_fragment(&mut self, name: &'t [SymbolTree], i: usize) {
        let frag = &name[i];

        if frag.is_embedded {
            self.push("`");
            self.do_symbol(frag);
            self.push("'");
            return;
        }

        if frag.is_ctor || frag.is_dtor {
            if frag.is_dtor {
                self.push("~");
            }
            match name.get(i + 1) {
                Some(class_frag) => {
                    let saved = self.template_params;
                    self.template_params = self
                        .attrs
                        .contains(Attributes::CDTOR_CLASS_TEMPLATE_PARAMETERS);
                    self.do_fragment_name(class_frag);
                    self.template_params = saved;
                }
                None => self.push("<ERRNOCLASS>"),
            }
            return;
        }

        if frag.simple_code == Code::OpType {
            self.do_conversion_operator(frag);
            return;
        }

        self.do_fragment_name(frag);
    }

    fn do_conversion_operator(&mut self, frag: &'t SymbolTree) {
        let rv = self.retval.filter(|rv| !rv.is_empty_type());
        let Some(rv) = rv else {
            // No conversion target in scope.
            self.push("operator");
            return;
        };
        let before = self
            .attrs
            .contains(Attributes::USER_DEFINED_CONVERSION_TEMPLATE_BEFORE_TYPE);
        self.push("operator");
        if before {
            self.do_template_params(frag);
        }
        self.sep();
        let was = std::mem::replace(&mut self.in_op_type, true);
        self.do_type(rv);
        self.in_op_type = was;
        if !before {
            self.do_template_params(frag);
        }
    }

    fn do_fragment_name(&mut self, frag: &'t SymbolTree) {
        match frag.simple_code {
            Code::Undefined if frag.is_anonymous => {
                if self.attrs.contains(Attributes::OUTPUT_ANONYMOUS_NUMBERS)
                    && !frag.simple_string.is_empty()
                {
                    let mut s = String::new();
                    let _ = write!(s, "`anonymous namespace {}'", frag.simple_string);
                    self.push(&s);
                } else {
                    self.push("`anonymous namespace'");
                }
            }
            Code::Undefined if !frag.name.is_empty() => self.do_fqn(&frag.name),
            Code::Undefined => self.push(&frag.simple_string),
            Code::RttiBaseClassDesc => {
                let n = |i: usize| frag.n.get(i).copied().unwrap_or(0);
                let mut s = String::new();
                let _ = write!(
                    s,
                    "`RTTI Base Class Descriptor at ({},{},{},{})'",
                    n(0),
                    n(1),
                    n(2),
                    n(3)
                );
                self.push(&s);
            }
            code => self.push(code_string(code)),
        }
        if self.template_params {
            self.do_template_params(frag);
        }
    }

    fn do_template_params(&mut self, frag: &'t SymbolTree) {
        let params: Vec<&TemplateParameter> = frag
            .template_parameters
            .iter()
            .filter_map(|p| p.as_ref())
            .collect();
        if params.is_empty() {
            return;
        }
        self.push("<");
        let saved = std::mem::replace(&mut self.template_params, true);
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.comma();
            }
            match param {
                TemplateParameter::Constant(value) => self.push(&value.to_string()),
                TemplateParameter::Type(t) => {
                    let saved_cconv = self.do_cconv;
                    if t.is_func && !t.is_pointer && !t.is_reference {
                        self.do_cconv = false;
                    }
                    self.do_type(t);
                    self.do_cconv = saved_cconv;
                }
                TemplateParameter::Pointer(sym) => {
                    if sym.symbol_type == SymbolType::ClassMethod
                        || (sym.is_func && sym.is_member)
                    {
                        self.push("{");
                        self.do_symbol(sym);
                        for v in &sym.n {
                            self.comma();
                            self.push(&v.to_string());
                        }
                        self.push("}");
                    } else {
                        self.push("&");
                        self.do_symbol(sym);
                    }
                }
            }
        }
        self.template_params = saved;
        self.push(">");
    }

    // ------------------------------------------------------------------
    // Types

    fn do_type(&mut self, t: &'t SymbolTree) {
        self.do_type_pre(t, false);
        self.do_type_post(t);
    }

    fn do_type_pre(&mut self, t: &'t SymbolTree, discard_cv: bool) {
        if t.is_pointer || t.is_reference || t.is_refref {
            self.do_pointer_pre(t, discard_cv);
        } else if t.is_array {
            if let Some(elem) = t.inner_type.as_deref() {
                self.do_type_pre(elem, false);
            }
        } else if t.is_func {
            // Bare function types keep their signature on the inner node.
            let f = t.inner_type.as_deref().unwrap_or(t);
            self.do_function_type_pre(f);
        } else {
            self.do_cv_prefix(t);
            self.do_type_name(t);
        }
    }

    fn do_type_post(&mut self, t: &'t SymbolTree) {
        if t.is_pointer || t.is_reference || t.is_refref {
            self.do_pointer_post(t);
        } else if t.is_array {
            self.do_array_dims(t);
            if let Some(elem) = t.inner_type.as_deref() {
                self.do_type_post(elem);
            }
        } else if t.is_func {
            let f = t.inner_type.as_deref().unwrap_or(t);
            self.do_function_type_post(f);
        }
    }

    fn do_array_dims(&mut self, t: &'t SymbolTree) {
        for dim in &t.dimensions {
            let mut s = String::new();
            let _ = write!(s, "[{dim}]");
            self.push(&s);
        }
    }

    fn do_pointer_pre(&mut self, t: &'t SymbolTree, discard_cv: bool) {
        let Some(inner) = t.inner_type.as_deref() else {
            self.pointer_punct(t);
            return;
        };
        if inner.is_func {
            // Pointers to functions wrap their declarator in parentheses,
            // with the class qualifier of pointers to members inside.
            if let Some(rv) = inner.retval.as_deref() {
                if !rv.is_empty_type() {
                    self.do_type_pre(rv, false);
                    self.sep();
                }
            }
            self.push("(");
            if !inner.calling_convention.is_empty() && self.do_cconv {
                // Adjacent identifiers still space themselves; the pointer
                // star hugs the convention, undname style.
                self.push(inner.calling_convention);
            }
            if !t.name.is_empty() {
                self.do_fqn(&t.name);
                self.push("::");
            }
            self.pointer_punct(t);
            if !discard_cv {
                self.pointer_cv(t);
            }
        } else if inner.is_array {
            if let Some(elem) = inner.inner_type.as_deref() {
                self.do_type_pre(elem, false);
                self.sep();
            }
            self.push("(");
            self.pointer_punct(t);
            if !discard_cv {
                self.pointer_cv(t);
            }
        } else {
            self.do_type_pre(inner, false);
            self.sep();
            self.pointer_punct(t);
            if !discard_cv {
                self.pointer_cv(t);
            }
        }
    }

    fn do_pointer_post(&mut self, t: &'t SymbolTree) {
        let Some(inner) = t.inner_type.as_deref() else {
            return;
        };
        if inner.is_func {
            self.push(")");
            self.do_args(&inner.args);
            self.do_trailing_qualifiers(inner);
            if let Some(rv) = inner.retval.as_deref() {
                self.do_type_post(rv);
            }
        } else if inner.is_array {
            self.push(")");
            self.do_array_dims(inner);
            if let Some(elem) = inner.inner_type.as_deref() {
                self.do_type_post(elem);
            }
        } else {
            self.do_type_post(inner);
        }
    }

    fn pointer_punct(&mut self, t: &'t SymbolTree) {
        if t.is_pointer {
            self.push(if t.is_gc { "^" } else { "*" });
        }
        if t.is_reference {
            self.push(if t.is_gc { "%" } else { "&" });
        }
        if t.is_refref {
            self.push("&&");
        }
    }

    /// Qualifiers on the pointer layer itself, after the punctuation.
    fn pointer_cv(&mut self, t: &'t SymbolTree) {
        if t.is_const {
            self.sep();
            self.push("const");
        }
        if t.is_volatile {
            self.sep();
            self.push("volatile");
        }
        if self.attrs.contains(Attributes::MS_QUALIFIERS) {
            if t.unaligned {
                self.sep();
                self.push("__unaligned");
            }
            if t.restrict {
                self.sep();
                self.push("__restrict");
            }
        }
        if self.attrs.contains(Attributes::OUTPUT_PTR64) {
            for _ in 0..t.ptr64 {
                self.sep();
                self.push("__ptr64");
            }
        }
    }

    fn do_function_type_pre(&mut self, t: &'t SymbolTree) {
        if let Some(rv) = t.retval.as_deref() {
            if !rv.is_empty_type() {
                self.do_type_pre(rv, false);
                self.sep();
            }
        }
        if !t.calling_convention.is_empty() && self.do_cconv {
            self.push(t.calling_convention);
        }
    }

    fn do_function_type_post(&mut self, t: &'t SymbolTree) {
        self.do_args(&t.args);
        self.do_trailing_qualifiers(t);
        if let Some(rv) = t.retval.as_deref() {
            self.do_type_post(rv);
        }
    }

    fn do_type_name(&mut self, t: &'t SymbolTree) {
        match t.simple_code {
            Code::Undefined => self.do_fragment_name(t),
            Code::Class | Code::Struct | Code::Union | Code::Enum => {
                if !self.attrs.contains(Attributes::DISABLE_PREFIXES) {
                    self.push(code_string(t.simple_code));
                    self.sep();
                }
                self.do_fqn(&t.name);
            }
            Code::Int8 => self.simple_or_std(t, "__int8"),
            Code::Int16 => self.simple_or_std(t, "__int16"),
            Code::Int32 => self.simple_or_std(t, "__int32"),
            Code::Int64 => self.simple_or_std(t, "__int64"),
            Code::Uint8 => self.simple_or_std(t, "unsigned __int8"),
            Code::Uint16 => self.simple_or_std(t, "unsigned __int16"),
            Code::Uint32 => self.simple_or_std(t, "unsigned __int32"),
            Code::Uint64 => self.simple_or_std(t, "unsigned __int64"),
            code => self.push(code_string(code)),
        }
    }

    fn simple_or_std(&mut self, t: &'t SymbolTree, ms_name: &str) {
        if self.attrs.contains(Attributes::MS_SIMPLE_TYPES) {
            self.push(ms_name);
        } else {
            self.push("std::");
            self.push(code_string(t.simple_code));
        }
    }

    // ------------------------------------------------------------------
    // Pieces

    fn do_args(&mut self, args: &'t [SymbolTree]) {
        self.push("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.comma();
            }
            self.do_type(arg);
        }
        self.push(")");
    }

    fn do_scope(&mut self, t: &'t SymbolTree) {
        let scope = match t.scope {
            Scope::Unspecified => return,
            Scope::Private => "private:",
            Scope::Protected => "protected:",
            Scope::Public => "public:",
        };
        self.push(scope);
        self.sep();
    }

    fn do_distance(&mut self, t: &'t SymbolTree) {
        let distance = match t.distance {
            crate::ast::Distance::Near if self.attrs.contains(Attributes::OUTPUT_NEAR) => "near",
            crate::ast::Distance::Far => "far",
            crate::ast::Distance::Huge => "huge",
            _ => return,
        };
        self.push(distance);
        self.sep();
    }

    /// Qualifiers before a type name: `const volatile __unaligned`.
    fn do_cv_prefix(&mut self, t: &'t SymbolTree) {
        if t.is_const {
            self.push("const");
            self.sep();
        }
        if t.is_volatile {
            self.push("volatile");
            self.sep();
        }
        if self.attrs.contains(Attributes::MS_QUALIFIERS) && t.unaligned {
            self.push("__unaligned");
            self.sep();
        }
    }

    /// Method qualifiers after the argument list.
    fn do_trailing_qualifiers(&mut self, t: &'t SymbolTree) {
        if t.is_const {
            self.sep();
            self.push("const");
        }
        if t.is_volatile {
            self.sep();
            self.push("volatile");
        }
        if self.attrs.contains(Attributes::MS_QUALIFIERS) {
            if t.unaligned {
                self.sep();
                self.push("__unaligned");
            }
            if t.restrict {
                self.sep();
                self.push("__restrict");
            }
        }
        if self.attrs.contains(Attributes::OUTPUT_PTR64) {
            for _ in 0..t.ptr64 {
                self.sep();
                self.push("__ptr64");
            }
        }
        if t.is_reference {
            self.sep();
            self.push("&");
        }
        if t.is_refref {
            self.sep();
            self.push("&&");
        }
    }
}

/// Quote a string payload, escaping the classic C escapes and appending the
/// terminating NUL the decoder stripped.
fn quote_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    out.push('"');
    for c in input.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0C' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0B' => out.push_str("\\v"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out.push_str("\\0\"");
    out
}
