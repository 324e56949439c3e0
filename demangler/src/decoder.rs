//! Recursive-descent decoder for the Visual Studio name mangling scheme.
//!
//! The decoder is a left-to-right stateful reader over the mangled bytes: a
//! cursor, two bounded back-reference stacks, and one method per grammar
//! production.  Back-references are single digits `0..9` resolving into the
//! first ten memorized names or types; template parameter lists swap both
//! stacks out for fresh ones and restore them on exit.
//!
//! ```text
//! <symbol>          = ? <fully-qualified-name> <symbol-type> <body>
//! <name>            = {<fragment>} @
//! <fragment>        = ?$ <template>
//!                   | ? <special-name>      // first fragment, or ?? anywhere
//!                   | ? <numbered-namespace>
//!                   | 0..9                  // back-reference
//!                   | <literal> @
//! <number>          = [?] (0..9 | {A..P} @)
//! ```
//!
//! Errors never recover: the first unrecognized byte aborts the parse with
//! its offset and the grammar slot that rejected it.

use crate::ast::{Distance, MethodProperty, Scope, SymbolTree, SymbolType, TemplateParameter};
use crate::codes::Code;
use crate::error::{MalformedSymbol, Result};

/// Both stacks memorize at most ten entries; later inserts are dropped.
const STACK_CAP: usize = 10;

#[derive(Clone, Copy)]
enum Stack {
    Name,
    Type,
}

pub(crate) struct Demangler<'a> {
    mangled: &'a [u8],
    offset: usize,
    debug: bool,
    name_stack: Vec<SymbolTree>,
    type_stack: Vec<SymbolTree>,
}

impl<'a> Demangler<'a> {
    pub fn new(mangled: &'a [u8], debug: bool) -> Self {
        Demangler {
            mangled,
            offset: 0,
            debug,
            name_stack: Vec::new(),
            type_stack: Vec::new(),
        }
    }

    /// Entry point.  The first byte selects the analysis mode.
    pub fn analyze(&mut self) -> Result<SymbolTree> {
        match self.cur("symbol")? {
            // RTTI-descriptor-alike: only a return type subtree.
            b'.' => {
                self.advance();
                let mut rv = SymbolTree::default();
                self.get_return_type(&mut rv)?;
                let mut t = SymbolTree::default();
                t.retval = Some(Box::new(rv));
                Ok(t)
            }
            // Reserved by the scheme, not supported here.
            b'_' => self.bad_code(b'_', "symbol"),
            b'?' => self.get_symbol(),
            c => self.bad_code(c, "symbol"),
        }
    }

    // ------------------------------------------------------------------
    // Cursor

    fn cur(&self, category: &'static str) -> Result<u8> {
        match self.mangled.get(self.offset) {
            Some(&c) => Ok(c),
            None => Err(MalformedSymbol {
                offset: self.offset,
                category,
                byte: 0,
            }),
        }
    }

    #[inline]
    fn advance(&mut self) {
        self.offset += 1;
    }

    /// Advance, then read the new current byte.
    fn next(&mut self, category: &'static str) -> Result<u8> {
        self.advance();
        self.cur(category)
    }

    /// Consume the current byte when it matches.
    fn eat(&mut self, byte: u8) -> bool {
        let matches = self.mangled.get(self.offset) == Some(&byte);
        self.offset += matches as usize;
        matches
    }

    fn bad_code<T>(&self, byte: u8, category: &'static str) -> Result<T> {
        Err(MalformedSymbol {
            offset: self.offset,
            category,
            byte,
        })
    }

    // ------------------------------------------------------------------
    // Debug tracing

    fn progress(&self, msg: &str) {
        if self.debug {
            let c = self.mangled.get(self.offset).map(|&c| c as char).unwrap_or('$');
            eprintln!("Parsing {msg} at character '{c}' at offset {}", self.offset);
        }
    }

    // ------------------------------------------------------------------
    // Back-reference stacks

    fn save(&mut self, stack: Stack, node: &SymbolTree) {
        let debug = self.debug;
        let (stack_name, stack) = match stack {
            Stack::Name => ("name", &mut self.name_stack),
            Stack::Type => ("type", &mut self.type_stack),
        };
        if stack.len() < STACK_CAP {
            stack.push(node.clone());
            if debug {
                eprintln!("Pushing {stack_name} position {} in stack", stack.len() - 1);
            }
        }
    }

    fn save_name(&mut self, node: &SymbolTree) {
        self.save(Stack::Name, node);
    }

    fn save_type(&mut self, node: &SymbolTree) {
        self.save(Stack::Type, node);
    }

    /// Resolve a single-digit position into a snapshot from the stack.
    /// Out-of-range positions yield a `ref#<n>` placeholder fragment.
    fn resolve_reference(&self, stack: Stack, poschar: u8) -> SymbolTree {
        let idx = (poschar - b'0') as usize;
        let stack = match stack {
            Stack::Name => &self.name_stack,
            Stack::Type => &self.type_stack,
        };
        match stack.get(idx) {
            Some(entry) => entry.clone(),
            None => SymbolTree::named(format!("ref#{idx}")),
        }
    }

    // ------------------------------------------------------------------
    // Numbers and literals

    /// Signed "MS number": `?` negates; `0..9` is the value plus one; `A..P`
    /// are hex digits terminated by `@`, at most sixteen of them.
    fn get_number(&mut self) -> Result<i64> {
        self.progress("number");
        let mut c = self.cur("number")?;
        let negative = c == b'?';
        if negative {
            self.advance();
            c = self.cur("number")?;
        }

        if c.is_ascii_digit() {
            self.advance();
            let num = (c - b'0') as i64 + 1;
            return Ok(if negative { num.wrapping_neg() } else { num });
        }

        let mut num: i64 = 0;
        let mut digits = 0usize;
        while let b'A'..=b'P' = c {
            num = num.wrapping_mul(16).wrapping_add((c - b'A') as i64);
            digits += 1;
            self.advance();
            c = self.cur("number")?;
        }
        if c != b'@' || digits == 0 || digits > 16 {
            return self.bad_code(c, "number");
        }
        self.progress("end of number");
        self.advance();
        Ok(if negative { num.wrapping_neg() } else { num })
    }

    /// Identifier characters up to a terminating `@`.
    fn get_literal(&mut self) -> Result<String> {
        let start = self.offset;
        self.progress("literal");
        loop {
            let c = self.cur("literal")?;
            match c {
                b'@' => break,
                b'_' | b'$' | b'<' | b'>' | b'-' | b'.' => {}
                _ if c.is_ascii_alphanumeric() => {}
                _ => return self.bad_code(c, "literal"),
            }
            self.advance();
        }
        let literal = String::from_utf8_lossy(&self.mangled[start..self.offset]).into_owned();
        self.advance();
        Ok(literal)
    }

    /// `A0x<hexdigits>@` following a lone `?` in a qualified name.  The hex
    /// identifier is preserved on the fragment.
    fn get_anonymous_namespace(&mut self) -> Result<SymbolTree> {
        self.progress("anonymous namespace");
        self.advance(); // the 'A'
        let start = self.offset;
        let c = self.cur("anonymous namespace")?;
        if c != b'0' {
            return self.bad_code(c, "anonymous namespace");
        }
        self.advance();
        let c = self.cur("anonymous namespace")?;
        if c != b'x' {
            return self.bad_code(c, "anonymous namespace");
        }
        self.advance();
        loop {
            let c = self.cur("anonymous namespace")?;
            if c == b'@' {
                break;
            }
            if !(c.is_ascii_lowercase() || c.is_ascii_digit()) {
                return self.bad_code(c, "anonymous namespace");
            }
            self.advance();
        }
        let literal = String::from_utf8_lossy(&self.mangled[start..self.offset]).into_owned();
        self.advance();
        let mut ans = SymbolTree::named(literal);
        ans.is_anonymous = true;
        Ok(ans)
    }

    // ------------------------------------------------------------------
    // Qualified names

    /// Parse name fragments into `t.name` until the terminating `@`.
    /// Fragments are stored innermost first.  `push` says whether the
    /// outermost first fragment may be memorized when it is a template.
    fn get_fully_qualified_name(&mut self, t: &mut SymbolTree, push: bool) -> Result<()> {
        let mut argno = 0usize;
        loop {
            let c = self.cur("literal")?;
            if c == b'@' {
                break;
            }
            let first = argno == 0;
            let pushing = !first || push;

            if c == b'?' {
                let c2 = self.next("special name")?;
                if c2 == b'$' {
                    let frag = self.add_templated_type()?;
                    if pushing {
                        self.save_name(&frag);
                    }
                    t.name.push(frag);
                } else if first || c2 == b'?' {
                    if self.add_special_name_code(t)? {
                        // A string or hex symbol replaces the symbol wholesale.
                        return Ok(());
                    }
                } else if c2 == b'A' {
                    let ns = self.get_anonymous_namespace()?;
                    self.save_name(&ns);
                    t.name.push(ns);
                } else {
                    let number = self.get_number()?;
                    t.name.push(SymbolTree::named(format!("`{number}'")));
                }
            } else if c.is_ascii_digit() {
                self.progress("reference to symbol");
                self.advance();
                t.name.push(self.resolve_reference(Stack::Name, c));
            } else {
                let ns = SymbolTree::named(self.get_literal()?);
                self.save_name(&ns);
                t.name.push(ns);
            }
            argno += 1;
        }
        self.progress("end of fully qualified name");
        self.advance();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Special names

    /// Parse the special name code at the cursor and append the fragment to
    /// `t.name`.  Returns true when the fragment replaced `t` wholesale
    /// (string constants and hex symbols carry their own symbol type).
    fn add_special_name_code(&mut self, t: &mut SymbolTree) -> Result<bool> {
        self.progress("special name");
        let c = self.cur("special name")?;
        let frag = match c {
            b'0' => {
                self.advance();
                let mut f = SymbolTree::default();
                f.is_ctor = true;
                f
            }
            b'1' => {
                self.advance();
                let mut f = SymbolTree::default();
                f.is_dtor = true;
                f
            }
            b'2' => self.coded_fragment(Code::OpNew),
            b'3' => self.coded_fragment(Code::OpDelete),
            b'4' => self.coded_fragment(Code::OpAssign),
            b'5' => self.coded_fragment(Code::OpRshift),
            b'6' => self.coded_fragment(Code::OpLshift),
            b'7' => self.coded_fragment(Code::OpNot),
            b'8' => self.coded_fragment(Code::OpEqual),
            b'9' => self.coded_fragment(Code::OpNotEqual),
            b'A' => self.coded_fragment(Code::OpIndex),
            b'B' => self.coded_fragment(Code::OpType),
            b'C' => self.coded_fragment(Code::OpIndirect),
            b'D' => self.coded_fragment(Code::OpStar),
            b'E' => self.coded_fragment(Code::OpPlusPlus),
            b'F' => self.coded_fragment(Code::OpMinusMinus),
            b'G' => self.coded_fragment(Code::OpMinus),
            b'H' => self.coded_fragment(Code::OpPlus),
            b'I' => self.coded_fragment(Code::OpAmp),
            b'J' => self.coded_fragment(Code::OpIndirectMethod),
            b'K' => self.coded_fragment(Code::OpDiv),
            b'L' => self.coded_fragment(Code::OpMod),
            b'M' => self.coded_fragment(Code::OpLess),
            b'N' => self.coded_fragment(Code::OpLessEq),
            b'O' => self.coded_fragment(Code::OpGreater),
            b'P' => self.coded_fragment(Code::OpGreaterEq),
            b'Q' => self.coded_fragment(Code::OpComma),
            b'R' => self.coded_fragment(Code::OpCall),
            b'S' => self.coded_fragment(Code::OpBnot),
            b'T' => self.coded_fragment(Code::OpBxor),
            b'U' => self.coded_fragment(Code::OpBor),
            b'V' => self.coded_fragment(Code::OpAnd),
            b'W' => self.coded_fragment(Code::OpOr),
            b'X' => self.coded_fragment(Code::OpStarAssign),
            b'Y' => self.coded_fragment(Code::OpPlusAssign),
            b'Z' => self.coded_fragment(Code::OpMinusAssign),
            b'?' => {
                let mut embedded = self.get_symbol()?;
                embedded.is_embedded = true;
                t.name.push(embedded);
                return Ok(false);
            }
            b'@' => {
                self.advance();
                let mut f = SymbolTree::default();
                f.symbol_type = SymbolType::HexSymbol;
                f.simple_string = self.get_literal()?;
                f
            }
            b'_' => {
                let c2 = self.next("special name '_'")?;
                match c2 {
                    b'0' => self.coded_fragment(Code::OpDivAssign),
                    b'1' => self.coded_fragment(Code::OpModAssign),
                    b'2' => self.coded_fragment(Code::OpRshiftAssign),
                    b'3' => self.coded_fragment(Code::OpLshiftAssign),
                    b'4' => self.coded_fragment(Code::OpAmpAssign),
                    b'5' => self.coded_fragment(Code::OpBorAssign),
                    b'6' => self.coded_fragment(Code::OpBxorAssign),
                    b'7' => self.coded_fragment(Code::Vftable),
                    b'8' => self.coded_fragment(Code::Vbtable),
                    b'9' => self.coded_fragment(Code::Vcall),
                    b'A' => self.coded_fragment(Code::Typeof),
                    b'B' => self.coded_fragment(Code::LocalStaticGuard),
                    b'C' => self.get_string()?,
                    b'D' => self.coded_fragment(Code::VbaseDtor),
                    b'E' => self.coded_fragment(Code::VectorDeletingDtor),
                    b'F' => self.coded_fragment(Code::DefaultCtorClosure),
                    b'G' => self.coded_fragment(Code::ScalarDeletingDtor),
                    b'H' => self.coded_fragment(Code::VectorCtorIter),
                    b'I' => self.coded_fragment(Code::VectorDtorIter),
                    b'J' => self.coded_fragment(Code::VectorVbaseCtorIter),
                    b'K' => self.coded_fragment(Code::VirtualDisplacementMap),
                    b'L' => self.coded_fragment(Code::EhVectorCtorIter),
                    b'M' => self.coded_fragment(Code::EhVectorDtorIter),
                    b'N' => self.coded_fragment(Code::EhVectorVbaseCtorIter),
                    b'O' => self.coded_fragment(Code::CopyCtorClosure),
                    b'P' => self.coded_fragment(Code::UdtReturning),
                    b'R' => {
                        self.add_rtti(t)?;
                        return Ok(false);
                    }
                    b'S' => self.coded_fragment(Code::LocalVftable),
                    b'T' => self.coded_fragment(Code::LocalVftableCtorClosure),
                    b'U' => self.coded_fragment(Code::OpNewArray),
                    b'V' => self.coded_fragment(Code::OpDeleteArray),
                    b'X' => self.coded_fragment(Code::PlacementDeleteClosure),
                    b'Y' => self.coded_fragment(Code::PlacementDeleteArrayClosure),
                    b'_' => {
                        let c3 = self.next("special name '__'")?;
                        match c3 {
                            b'A' => self.coded_fragment(Code::ManagedVectorCtorIter),
                            b'B' => self.coded_fragment(Code::ManagedVectorDtorIter),
                            b'C' => self.coded_fragment(Code::EhVectorCopyCtorIter),
                            b'D' => self.coded_fragment(Code::EhVectorVbaseCopyCtorIter),
                            b'E' => self.coded_fragment(Code::DynamicInitializer),
                            b'F' => self.coded_fragment(Code::DynamicAtexitDtor),
                            b'G' => self.coded_fragment(Code::VectorCopyCtorIter),
                            b'H' => self.coded_fragment(Code::VectorVbaseCopyCtorIter),
                            b'I' => self.coded_fragment(Code::ManagedVectorCopyCtorIter),
                            b'J' => self.coded_fragment(Code::LocalStaticThreadGuard),
                            b'K' => self.coded_fragment(Code::OpDquote),
                            _ => return self.bad_code(c3, "special name '__'"),
                        }
                    }
                    _ => return self.bad_code(c2, "special name '_'"),
                }
            }
            _ => return self.bad_code(c, "special name"),
        };

        if frag.symbol_type != t.symbol_type && !frag.is_embedded {
            *t = frag;
            return Ok(true);
        }
        t.name.push(frag);
        Ok(false)
    }

    /// Single-code fragment helper: consumes the current byte.
    fn coded_fragment(&mut self, code: Code) -> SymbolTree {
        self.advance();
        SymbolTree::coded(code)
    }

    /// RTTI descriptor trailers after `?_R`.
    fn add_rtti(&mut self, t: &mut SymbolTree) -> Result<()> {
        let c = self.next("RTTI")?;
        match c {
            b'0' => {
                self.advance();
                let mut rv = SymbolTree::default();
                self.get_return_type(&mut rv)?;
                t.retval = Some(Box::new(rv));
                t.name.push(SymbolTree::coded(Code::RttiTypeDesc));
            }
            b'1' => {
                self.advance();
                let mut frag = SymbolTree::coded(Code::RttiBaseClassDesc);
                for _ in 0..4 {
                    let n = self.get_number()?;
                    frag.n.push(n);
                }
                t.name.push(frag);
            }
            b'2' => {
                self.advance();
                t.name.push(SymbolTree::coded(Code::RttiBaseClassArray));
            }
            b'3' => {
                self.advance();
                t.name.push(SymbolTree::coded(Code::RttiClassHierarchyDesc));
            }
            b'4' => {
                self.advance();
                t.name.push(SymbolTree::coded(Code::RttiCompleteObjLocator));
            }
            _ => return self.bad_code(c, "RTTI"),
        }
        Ok(())
    }

    /// String constants: `??_C@_0<len>@<checksum>@<payload>@`.
    fn get_string(&mut self) -> Result<SymbolTree> {
        let c = self.next("string constant")?;
        if c != b'@' {
            return self.bad_code(c, "string constant");
        }
        let c = self.next("string constant")?;
        if c != b'_' {
            return self.bad_code(c, "string constant");
        }
        let c = self.next("string constant")?;
        let multibyte = match c {
            b'0' => false,
            b'1' => true,
            _ => return self.bad_code(c, "string constant"),
        };
        self.advance();

        let real_len = self.get_number()?;
        let len = real_len.min(if multibyte { 64 } else { 32 });
        self.get_number()?; // checksum, discarded

        let mut raw = Vec::new();
        for _ in 0..len {
            let c = self.cur("string constant")?;
            if c == b'@' {
                break;
            }
            let v = if c == b'?' {
                let c = self.next("string special char")?;
                if c == b'$' {
                    // two A..P nibbles form one byte
                    let mut v = 0u8;
                    for _ in 0..2 {
                        let c = self.next("character hex digit")?;
                        if !(b'A'..=b'P').contains(&c) {
                            return self.bad_code(c, "character hex digit");
                        }
                        v = v.wrapping_mul(16).wrapping_add(c - b'A');
                    }
                    v
                } else if c.is_ascii_digit() {
                    b",/\\:. \x0B\n'-"[(c - b'0') as usize]
                } else if c.is_ascii_alphabetic() {
                    c.wrapping_add(0x80)
                } else {
                    return self.bad_code(c, "string special char");
                }
            } else {
                c
            };
            raw.push(v);
            self.advance();
        }

        let mut payload = if multibyte {
            let wide: Vec<u16> = raw
                .chunks(2)
                .map(|pair| {
                    let hi = pair[0] as u16;
                    let lo = pair.get(1).copied().unwrap_or(0) as u16;
                    hi * 0x100 + lo
                })
                .collect();
            String::from_utf16_lossy(&wide)
        } else {
            String::from_utf8_lossy(&raw).into_owned()
        };
        if payload.ends_with('\0') {
            payload.pop();
        }

        let mut t = SymbolTree::default();
        t.symbol_type = SymbolType::String;
        t.simple_string = String::from("`string'");
        t.is_pointer = true;
        t.inner_type = Some(Box::new(SymbolTree::coded(if multibyte {
            Code::Char16
        } else {
            Code::Char
        })));
        t.n.push(if multibyte { real_len / 2 } else { real_len });
        t.name.push(SymbolTree::named(payload));
        Ok(t)
    }

    // ------------------------------------------------------------------
    // Templates

    /// Templated fragment: the bare body name, then the parameter list with
    /// freshly swapped reference stacks.  The cursor sits on the `$` of the
    /// introducing `?$`.
    fn add_templated_type(&mut self) -> Result<SymbolTree> {
        self.advance();
        self.progress("templated symbol");

        // The body is a special code, a nested template, or a literal; never
        // a fully qualified name.  The bare name is memorized on the
        // enclosing stack before the parameter scope starts.
        let c = self.cur("template argument")?;
        let mut frag = if c == b'?' {
            let c2 = self.next("special name")?;
            if c2 == b'$' {
                let inner = self.add_templated_type()?;
                self.save_name(&inner);
                inner
            } else {
                let mut scratch = SymbolTree::default();
                let replaced = self.add_special_name_code(&mut scratch)?;
                if replaced {
                    scratch
                } else {
                    scratch.name.pop().unwrap_or_default()
                }
            }
        } else {
            let frag = SymbolTree::named(self.get_literal()?);
            self.save_name(&frag);
            frag
        };

        if self.debug {
            eprintln!("Pushing name and type stacks and resetting to empty");
        }
        let saved_names = std::mem::take(&mut self.name_stack);
        let saved_types = std::mem::take(&mut self.type_stack);
        let params = self.get_template_parameters(&mut frag);
        self.name_stack = saved_names;
        self.type_stack = saved_types;
        if self.debug {
            eprintln!("Popping name and type stacks");
        }
        params?;
        Ok(frag)
    }

    fn get_template_parameters(&mut self, frag: &mut SymbolTree) -> Result<()> {
        loop {
            let c = self.cur("template argument")?;
            if c == b'@' {
                break;
            }
            let param = if c == b'$' {
                let c2 = self.next("template argument")?;
                match c2 {
                    b'0' => {
                        self.advance();
                        self.progress("constant template parameter");
                        Some(TemplateParameter::Constant(self.get_number()?))
                    }
                    b'1' => {
                        self.advance();
                        self.progress("constant pointer template parameter");
                        Some(TemplateParameter::Pointer(self.get_symbol()?))
                    }
                    b'H' => {
                        self.advance();
                        self.progress("constant function pointer template parameter");
                        let mut sym = self.get_symbol()?;
                        let n = self.get_number()?;
                        sym.n.push(n);
                        Some(TemplateParameter::Pointer(sym))
                    }
                    b'I' => {
                        self.advance();
                        self.progress("constant member pointer template parameter");
                        let mut sym = self.get_symbol()?;
                        for _ in 0..2 {
                            let n = self.get_number()?;
                            sym.n.push(n);
                        }
                        Some(TemplateParameter::Pointer(sym))
                    }
                    b'S' => {
                        self.advance();
                        self.progress("empty non-type parameter pack");
                        None
                    }
                    b'$' => {
                        // Interpret as a `$$` type.  Any number of `$`s may
                        // pile up first; skip to the last two.
                        let mut pos = self.offset;
                        while pos < self.mangled.len() && self.mangled[pos] == b'$' {
                            pos += 1;
                        }
                        if pos == self.mangled.len() {
                            return self.bad_code(c2, "template argument");
                        }
                        self.offset = pos - 2;
                        let mut ty = SymbolTree::default();
                        if self.get_type(&mut ty, false)? {
                            Some(TemplateParameter::Type(ty))
                        } else {
                            None
                        }
                    }
                    _ => return self.bad_code(c2, "template argument"),
                }
            } else {
                let mut ty = SymbolTree::default();
                if self.get_type(&mut ty, false)? {
                    Some(TemplateParameter::Type(ty))
                } else {
                    None
                }
            };
            frag.template_parameters.push(param);
        }
        self.progress("end of template parameters");
        self.advance();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Types

    /// Parse a type into `t`.  Returns false for the null type produced by
    /// an end-of-parameter-pack marker.  `push` snapshots the result onto
    /// the type stack; single-letter primitives and resolved references are
    /// never memorized.
    fn get_type(&mut self, t: &mut SymbolTree, push: bool) -> Result<bool> {
        self.progress("type");
        let c = self.cur("type")?;
        match c {
            b'A' => {
                t.is_reference = true;
                self.advance();
                self.get_pointer_type(t)?;
            }
            b'B' => {
                t.is_reference = true;
                t.is_volatile = true;
                self.advance();
                self.get_pointer_type(t)?;
            }
            b'C' => return self.simple_type(t, Code::SignedChar),
            b'D' => return self.simple_type(t, Code::Char),
            b'E' => return self.simple_type(t, Code::UnsignedChar),
            b'F' => return self.simple_type(t, Code::Short),
            b'G' => return self.simple_type(t, Code::UnsignedShort),
            b'H' => return self.simple_type(t, Code::Int),
            b'I' => return self.simple_type(t, Code::UnsignedInt),
            b'J' => return self.simple_type(t, Code::Long),
            b'K' => return self.simple_type(t, Code::UnsignedLong),
            b'M' => return self.simple_type(t, Code::Float),
            b'N' => return self.simple_type(t, Code::Double),
            b'O' => return self.simple_type(t, Code::LongDouble),
            b'P' => {
                t.is_pointer = true;
                self.advance();
                self.get_pointer_type(t)?;
            }
            b'Q' => {
                t.is_pointer = true;
                t.is_const = true;
                self.advance();
                self.get_pointer_type(t)?;
            }
            b'R' => {
                // Volatile pointers are not memorized, matching undname.
                t.is_pointer = true;
                t.is_volatile = true;
                self.advance();
                self.get_pointer_type(t)?;
                return Ok(true);
            }
            b'S' => {
                t.is_pointer = true;
                t.is_const = true;
                t.is_volatile = true;
                self.advance();
                self.get_pointer_type(t)?;
            }
            b'T' => {
                t.simple_code = Code::Union;
                self.advance();
                self.get_fully_qualified_name(t, true)?;
            }
            b'U' => {
                t.simple_code = Code::Struct;
                self.advance();
                self.get_fully_qualified_name(t, true)?;
            }
            b'V' => {
                t.simple_code = Code::Class;
                self.advance();
                self.get_fully_qualified_name(t, true)?;
            }
            b'W' => {
                t.simple_code = Code::Enum;
                self.advance();
                self.get_real_enum_type(t)?;
                self.get_fully_qualified_name(t, true)?;
            }
            b'X' => return self.simple_type(t, Code::Void),
            b'Y' => {
                self.advance();
                self.get_array_type(t)?;
            }
            b'Z' => return self.simple_type(t, Code::Ellipsis),
            b'0'..=b'9' => {
                self.advance();
                *t = self.resolve_reference(Stack::Type, c);
                return Ok(true);
            }
            b'_' => {
                // Two-letter extended primitives, unlike the single-letter
                // ones, are worth memorizing.
                let c2 = self.next("extended '_' type")?;
                t.simple_code = match c2 {
                    b'D' => Code::Int8,
                    b'E' => Code::Uint8,
                    b'F' => Code::Int16,
                    b'G' => Code::Uint16,
                    b'H' => Code::Int32,
                    b'I' => Code::Uint32,
                    b'J' => Code::Int64,
                    b'K' => Code::Uint64,
                    b'L' => Code::Int128,
                    b'M' => Code::Uint128,
                    b'N' => Code::Bool,
                    b'S' => Code::Char16,
                    b'U' => Code::Char32,
                    b'W' => Code::Wchar,
                    _ => return self.bad_code(c2, "extended '_' type"),
                };
                self.advance();
            }
            b'?' => {
                // Type modifier: a storage class, then the type itself.
                self.advance();
                self.get_storage_class(t)?;
                self.get_type(t, false)?;
            }
            b'$' => {
                let c2 = self.next("type")?;
                if c2 != b'$' {
                    return self.bad_code(c2, "type");
                }
                let c3 = self.next("extended '$$' type")?;
                match c3 {
                    b'Q' => {
                        t.is_refref = true;
                        self.advance();
                        self.get_pointer_type(t)?;
                    }
                    b'R' => {
                        t.is_volatile = true;
                        t.is_refref = true;
                        self.advance();
                        self.get_pointer_type(t)?;
                    }
                    b'A' => {
                        t.is_func = true;
                        self.advance();
                        self.get_pointer_type(t)?;
                    }
                    b'B' => {
                        // Array type in a template; the next byte is 'Y'.
                        self.advance();
                        self.get_type(t, false)?;
                    }
                    b'C' => {
                        self.advance();
                        self.get_storage_class(t)?;
                        self.get_type(t, false)?;
                    }
                    b'T' => {
                        self.advance();
                        t.name.push(SymbolTree::named("nullptr_t"));
                        t.name.push(SymbolTree::named("std"));
                    }
                    b'V' | b'Z' => {
                        // End of a parameter pack.
                        self.advance();
                        return Ok(false);
                    }
                    _ => return self.bad_code(c3, "extended '$$' type"),
                }
            }
            _ => return self.bad_code(c, "type"),
        }
        if push {
            self.save_type(t);
        }
        Ok(true)
    }

    fn simple_type(&mut self, t: &mut SymbolTree, code: Code) -> Result<bool> {
        t.simple_code = code;
        self.advance();
        Ok(true)
    }

    /// Underlying integer type of an enum.
    fn get_real_enum_type(&mut self, t: &mut SymbolTree) -> Result<()> {
        self.progress("enum real type");
        let c = self.cur("enum real type")?;
        let code = match c {
            b'0' => Code::SignedChar,
            b'1' => Code::UnsignedChar,
            b'2' => Code::Short,
            b'3' => Code::UnsignedShort,
            b'4' => Code::Int,
            b'5' => Code::UnsignedInt,
            b'6' => Code::Long,
            b'7' => Code::UnsignedLong,
            _ => return self.bad_code(c, "enum real type"),
        };
        self.advance();
        t.enum_real_type = Some(Box::new(SymbolTree::coded(code)));
        Ok(())
    }

    /// Array: dimension count, the dimensions, then the element type.
    fn get_array_type(&mut self, t: &mut SymbolTree) -> Result<()> {
        t.is_array = true;
        let num_dim = self.get_number()?;
        for _ in 0..num_dim.max(0) {
            let dim = self.get_number()?;
            t.dimensions.push(dim as u64);
        }
        let mut elem = SymbolTree::default();
        self.get_type(&mut elem, false)?;
        t.inner_type = Some(Box::new(elem));
        Ok(())
    }

    /// Everything after the pointer or reference letter: modifiers, managed
    /// properties, the pointee storage class, an optional member-pointer
    /// class name, and the pointee itself.
    fn get_pointer_type(&mut self, t: &mut SymbolTree) -> Result<()> {
        self.get_storage_class_modifiers(t)?;
        let cli_array = self.get_managed_properties(t)?;

        self.progress("pointer storage class");
        let mut inner = SymbolTree::default();
        self.get_storage_class(&mut inner)?;

        if inner.is_member && !inner.is_based {
            // The enclosing class of a pointer to member.
            self.get_fully_qualified_name(t, true)?;
        }

        if inner.is_func {
            self.progress("function pointed to");
            self.get_function(&mut inner)?;
        } else {
            self.progress("type pointed to");
            self.get_type(&mut inner, false)?;
        }

        if cli_array != 0 {
            // cli::array<T [, rank]> wrapping, recognized but not
            // semantically interpreted.
            let mut array = SymbolTree::named("array");
            array
                .template_parameters
                .push(Some(TemplateParameter::Type(inner)));
            if cli_array > 1 {
                array
                    .template_parameters
                    .push(Some(TemplateParameter::Constant(cli_array)));
            }
            let mut at = SymbolTree::default();
            at.name.push(array);
            at.name.push(SymbolTree::named("cli"));
            t.is_gc = true;
            t.inner_type = Some(Box::new(at));
        } else {
            t.inner_type = Some(Box::new(inner));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Storage classes

    /// Zero or more of the modifier letters `E F G H I`.
    fn get_storage_class_modifiers(&mut self, t: &mut SymbolTree) -> Result<()> {
        loop {
            match self.mangled.get(self.offset) {
                Some(b'E') => t.ptr64 = (t.ptr64 + 1).min(2),
                Some(b'F') => t.unaligned = true,
                Some(b'G') => t.is_reference = true,
                Some(b'H') => t.is_refref = true,
                Some(b'I') => t.restrict = true,
                _ => return Ok(()),
            }
            self.progress("pointer storage class modifier");
            self.advance();
        }
    }

    /// Managed C++ properties behind `$`.  Returns the C++/CLI array rank
    /// (0 when absent, -1 for an explicit rank of zero).
    fn get_managed_properties(&mut self, t: &mut SymbolTree) -> Result<i64> {
        if self.mangled.get(self.offset) != Some(&b'$') {
            return Ok(0);
        }
        let c = self.next("managed C++ property")?;
        let mut cli_array = 0;
        match c {
            b'A' => t.is_gc = true,
            b'B' => t.is_pin = true,
            b'0' | b'1' | b'2' => {
                let hi = self.hex_digit(c)?;
                let c = self.next("hex digit")?;
                let lo = self.hex_digit(c)?;
                let val = hi * 16 + lo;
                cli_array = if val != 0 { val } else { -1 };
            }
            _ => return self.bad_code(c, "managed C++ property"),
        }
        self.advance();
        Ok(cli_array)
    }

    fn hex_digit(&self, c: u8) -> Result<i64> {
        match c {
            b'0'..=b'9' => Ok((c - b'0') as i64),
            b'a'..=b'f' => Ok((c - b'a') as i64),
            b'A'..=b'F' => Ok((c - b'A') as i64),
            _ => self.bad_code(c, "hex digit"),
        }
    }

    /// Storage class proper, Agner Fog's Table 10.  The duplicated rows
    /// (C/G, K) reflect the scheme's own ambiguity and are kept as-is.
    fn get_storage_class(&mut self, t: &mut SymbolTree) -> Result<()> {
        use Distance::{Far, Near};
        let c = self.cur("storage class")?;
        //                 distance  const  volat  func   based  member
        let row = match c {
            b'A' => (Near, false, false, false, false, false),
            b'B' => (Near, true, false, false, false, false),
            b'C' => (Near, false, true, false, false, false),
            b'D' => (Near, true, true, false, false, false),
            b'G' => (Near, false, true, false, false, false),
            b'H' => (Near, true, true, false, false, false),
            b'J' => (Near, true, false, false, false, false),
            b'K' => (Near, false, true, false, false, false),
            b'L' => (Near, true, true, false, false, false),
            b'M' => (Near, false, false, false, true, false),
            b'N' => (Near, true, false, false, true, false),
            b'O' => (Near, false, true, false, true, false),
            b'P' => (Near, true, true, false, true, false),
            b'Q' => (Near, false, false, false, false, true),
            b'R' => (Near, true, false, false, false, true),
            b'S' => (Near, false, true, false, false, true),
            b'T' => (Near, true, true, false, false, true),
            b'U' => (Far, false, false, false, false, true),
            b'V' => (Far, true, false, false, false, true),
            b'W' => (Far, false, true, false, false, true),
            b'X' => (Far, true, true, false, false, true),
            b'Y' => (Far, false, false, false, false, true),
            b'Z' => (Far, true, false, false, false, true),
            b'0' => (Far, false, true, false, false, true),
            b'1' => (Far, true, true, false, false, true),
            b'2' => (Near, false, false, false, true, true),
            b'3' => (Near, true, false, false, true, true),
            b'4' => (Near, false, true, false, true, true),
            b'5' => (Near, true, true, false, true, true),
            b'6' => (Near, false, false, true, false, false),
            b'7' => (Far, false, false, true, false, false),
            b'8' => (Near, false, false, true, false, true),
            b'9' => (Far, false, false, true, false, true),
            b'_' => {
                let c2 = self.next("extended storage class")?;
                let row = match c2 {
                    b'A' => (Near, false, false, true, true, false),
                    b'B' => (Far, false, false, true, true, false),
                    b'C' => (Near, false, false, true, true, true),
                    b'D' => (Far, false, false, true, true, true),
                    _ => return self.bad_code(c2, "extended storage class"),
                };
                self.advance();
                return Ok(Self::update_storage_class(t, row));
            }
            _ => return self.bad_code(c, "storage class"),
        };
        self.advance();
        Self::update_storage_class(t, row);
        Ok(())
    }

    fn update_storage_class(
        t: &mut SymbolTree,
        (distance, is_const, is_volatile, is_func, is_based, is_member): (
            Distance,
            bool,
            bool,
            bool,
            bool,
            bool,
        ),
    ) {
        t.distance = distance;
        t.is_const = is_const;
        t.is_volatile = is_volatile;
        t.is_func = is_func;
        t.is_based = is_based;
        t.is_member = is_member;
    }

    /// Return storage class, Table 12: optional, introduced by `?`.
    fn process_return_storage_class(&mut self, t: &mut SymbolTree) -> Result<()> {
        if !self.eat(b'?') {
            t.is_const = false;
            t.is_volatile = false;
            return Ok(());
        }
        let c = self.cur("return storage class")?;
        match c {
            b'A' => {}
            b'B' => t.is_const = true,
            b'C' => t.is_volatile = true,
            b'D' => {
                t.is_const = true;
                t.is_volatile = true;
            }
            _ => return self.bad_code(c, "return storage class"),
        }
        self.advance();
        Ok(())
    }

    /// Method storage class, Table 15: modifiers, then `A..D`.
    fn process_method_storage_class(&mut self, t: &mut SymbolTree) -> Result<()> {
        self.get_storage_class_modifiers(t)?;
        let cli_array = self.get_managed_properties(t)?;
        if cli_array != 0 {
            let c = self.cur("method storage class").unwrap_or(0);
            return self.bad_code(c, "method storage class");
        }
        let c = self.cur("method storage class")?;
        match c {
            b'A' => {}
            b'B' => t.is_const = true,
            b'C' => t.is_volatile = true,
            b'D' => {
                t.is_const = true;
                t.is_volatile = true;
            }
            _ => return self.bad_code(c, "method storage class"),
        }
        self.advance();
        Ok(())
    }

    fn process_calling_convention(&mut self, t: &mut SymbolTree) -> Result<()> {
        self.progress("calling convention");
        let c = self.cur("calling convention")?;
        let (exported, conv) = match c {
            b'A' => (false, "__cdecl"),
            b'B' => (true, "__cdecl"),
            b'C' => (false, "__pascal"),
            b'D' => (true, "__pascal"),
            b'E' => (false, "__thiscall"),
            b'F' => (true, "__thiscall"),
            b'G' => (false, "__stdcall"),
            b'H' => (true, "__stdcall"),
            b'I' => (false, "__fastcall"),
            b'J' => (true, "__fastcall"),
            b'K' => (false, "__unknown"),
            b'L' => (true, "__unknown"),
            b'M' => (false, "__clrcall"),
            _ => return self.bad_code(c, "calling convention"),
        };
        t.is_exported = exported;
        t.calling_convention = conv;
        self.advance();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Functions

    /// Return type: `@` encodes an absent one (constructors, destructors),
    /// which stays an empty node.
    fn get_return_type(&mut self, t: &mut SymbolTree) -> Result<()> {
        if self.cur("return storage class")? == b'@' {
            self.advance();
            return Ok(());
        }
        self.progress("return value storage class");
        self.process_return_storage_class(t)?;
        self.progress("return value type");
        self.get_type(t, false)?;
        Ok(())
    }

    /// Calling convention, return type, then arguments.  A lone leading
    /// `void` is the whole parameter list; an ellipsis ends it; otherwise an
    /// explicit `@` does.  Argument types are memorized.
    fn get_function(&mut self, t: &mut SymbolTree) -> Result<()> {
        if t.symbol_type == SymbolType::Unspecified && t.is_func && t.is_member {
            // Pointer to member function: the method's own storage class
            // precedes the calling convention.
            let mut tmp = SymbolTree::default();
            self.get_storage_class_modifiers(&mut tmp)?;
            self.get_storage_class(&mut tmp)?;
            t.is_const = tmp.is_const;
            t.is_volatile = tmp.is_volatile;
            t.ptr64 = (t.ptr64 + tmp.ptr64).min(2);
            t.unaligned = tmp.unaligned;
            t.restrict = tmp.restrict;
        }

        self.process_calling_convention(t)?;

        let mut rv = SymbolTree::default();
        self.get_return_type(&mut rv)?;
        t.retval = Some(Box::new(rv));

        self.progress("start of function arguments");
        let mut argno = 0usize;
        loop {
            if argno > 0 && self.cur("type")? == b'@' {
                self.progress("end of args");
                self.advance();
                break;
            }
            self.progress("function argument");
            let mut arg = SymbolTree::default();
            let non_null = self.get_type(&mut arg, true)?;
            let code = arg.simple_code;
            if non_null {
                t.args.push(arg);
            }
            argno += 1;
            // A first parameter of void is the only parameter; an ellipsis
            // is always the last.
            if argno == 1 && code == Code::Void {
                break;
            }
            if code == Code::Ellipsis {
                break;
            }
        }
        self.progress("end of function arguments");

        self.eat(b'Z');
        Ok(())
    }

    // ------------------------------------------------------------------
    // Symbols

    /// Symbol type code, Agner Fog's Table 14.
    fn get_symbol_type(&mut self, t: &mut SymbolTree) -> Result<()> {
        use MethodProperty::{Ordinary, Static, Thunk, Virtual};
        use Scope::{Private, Protected, Public};

        self.progress("symbol type");
        let c = self.cur("symbol type")?;
        match c {
            b'0' => Self::update_member(t, Private),
            b'1' => Self::update_member(t, Protected),
            b'2' => Self::update_member(t, Public),
            b'3' | b'4' => t.symbol_type = SymbolType::GlobalObject,
            b'5' => t.symbol_type = SymbolType::StaticGuard,
            b'6' | b'7' => t.symbol_type = SymbolType::VTable,
            b'8' | b'9' => t.symbol_type = SymbolType::Rtti,

            b'A' => Self::update_method(t, Private, Ordinary, Distance::Near),
            b'B' => Self::update_method(t, Private, Ordinary, Distance::Far),
            b'C' => Self::update_method(t, Private, Static, Distance::Near),
            b'D' => Self::update_method(t, Private, Static, Distance::Far),
            b'E' => Self::update_method(t, Private, Virtual, Distance::Near),
            b'F' => Self::update_method(t, Private, Virtual, Distance::Far),
            b'G' => Self::update_method(t, Private, Thunk, Distance::Near),
            b'H' => Self::update_method(t, Private, Thunk, Distance::Far),
            b'I' => Self::update_method(t, Protected, Ordinary, Distance::Near),
            b'J' => Self::update_method(t, Protected, Ordinary, Distance::Far),
            b'K' => Self::update_method(t, Protected, Static, Distance::Near),
            b'L' => Self::update_method(t, Protected, Static, Distance::Far),
            b'M' => Self::update_method(t, Protected, Virtual, Distance::Near),
            b'N' => Self::update_method(t, Protected, Virtual, Distance::Far),
            b'O' => Self::update_method(t, Protected, Thunk, Distance::Near),
            b'P' => Self::update_method(t, Protected, Thunk, Distance::Far),
            b'Q' => Self::update_method(t, Public, Ordinary, Distance::Near),
            b'R' => Self::update_method(t, Public, Ordinary, Distance::Far),
            b'S' => Self::update_method(t, Public, Static, Distance::Near),
            b'T' => Self::update_method(t, Public, Static, Distance::Far),
            b'U' => Self::update_method(t, Public, Virtual, Distance::Near),
            b'V' => Self::update_method(t, Public, Virtual, Distance::Far),
            b'W' => Self::update_method(t, Public, Thunk, Distance::Near),
            b'X' => Self::update_method(t, Public, Thunk, Distance::Far),

            b'Y' => {
                t.symbol_type = SymbolType::GlobalFunction;
                t.is_func = true;
                t.distance = Distance::Near;
            }
            b'Z' => {
                t.symbol_type = SymbolType::GlobalFunction;
                t.is_func = true;
                t.distance = Distance::Far;
            }
            b'$' => {
                self.advance();
                let c2 = self.cur("extended symbol type")?;
                match c2 {
                    b'0' => Self::update_method(t, Private, Thunk, Distance::Near),
                    b'1' => Self::update_method(t, Private, Thunk, Distance::Far),
                    b'2' => Self::update_method(t, Protected, Thunk, Distance::Near),
                    b'3' => Self::update_method(t, Protected, Thunk, Distance::Far),
                    b'4' => Self::update_method(t, Public, Thunk, Distance::Near),
                    b'5' => Self::update_method(t, Public, Thunk, Distance::Far),
                    b'B' => {
                        self.advance();
                        t.method_property = Thunk;
                        t.symbol_type = SymbolType::MethodThunk;
                        return Ok(());
                    }
                    b'$' => {
                        self.advance();
                        let c3 = self.cur("symbol type prefix")?;
                        match c3 {
                            b'J' => {
                                self.advance();
                                t.extern_c = true;
                                // Skip the next <number> - 1 bytes.
                                let skip = self.get_number()?.wrapping_sub(1);
                                for _ in 0..skip.max(0) {
                                    self.advance();
                                }
                            }
                            // No difference in undname output.
                            b'F' | b'H' => self.advance(),
                            _ => return self.bad_code(c3, "symbol type prefix"),
                        }
                        return self.get_symbol_type(t);
                    }
                    _ => return self.bad_code(c2, "extended symbol type"),
                }
                self.advance();
                t.symbol_type = SymbolType::VtorDisp;
                return Ok(());
            }
            _ => return self.bad_code(c, "symbol type"),
        }
        self.advance();
        Ok(())
    }

    fn update_member(t: &mut SymbolTree, scope: Scope) {
        t.symbol_type = SymbolType::StaticClassMember;
        t.is_member = true;
        t.scope = scope;
        t.method_property = MethodProperty::Static;
    }

    fn update_method(t: &mut SymbolTree, scope: Scope, prop: MethodProperty, distance: Distance) {
        t.symbol_type = SymbolType::ClassMethod;
        t.is_func = true;
        t.is_member = true;
        t.scope = scope;
        t.method_property = prop;
        t.distance = distance;
    }

    /// A whole symbol: the leading `?`, the qualified name, the symbol type,
    /// and the entity-specific body.
    fn get_symbol(&mut self) -> Result<SymbolTree> {
        let c = self.cur("symbol")?;
        if c != b'?' {
            return self.bad_code(c, "symbol");
        }
        self.progress("new symbol");
        self.advance();

        let mut t = SymbolTree::default();
        self.get_fully_qualified_name(&mut t, false)?;
        if t.symbol_type == SymbolType::Unspecified {
            self.get_symbol_type(&mut t)?;
        }

        match t.symbol_type {
            SymbolType::VTable => {
                t.instance_name = std::mem::take(&mut t.name);
                self.process_method_storage_class(&mut t)?;
                // Interface names are optional.
                while self.cur("symbol type")? != b'@' {
                    let mut iface = SymbolTree::default();
                    self.get_fully_qualified_name(&mut iface, false)?;
                    t.com_interface.push(iface);
                }
                Ok(t)
            }
            SymbolType::String | SymbolType::Rtti | SymbolType::HexSymbol => Ok(t),
            SymbolType::GlobalObject | SymbolType::StaticClassMember => {
                t.instance_name = std::mem::take(&mut t.name);
                self.get_type_into_symbol(&mut t)?;
                self.get_storage_class_modifiers(&mut t)?;
                self.get_storage_class(&mut t)?;
                Ok(t)
            }
            SymbolType::VtorDisp | SymbolType::ClassMethod => {
                if t.symbol_type == SymbolType::VtorDisp {
                    // The this-pointer displacement.
                    let n = self.get_number()?;
                    t.n.push(n);
                }
                if t.method_property == MethodProperty::Thunk {
                    // The thunk adjustor offset.
                    t.n.resize(1, 0);
                    let n = self.get_number()?;
                    t.n.push(n);
                }
                // Static class methods carry no storage class code.
                if t.method_property != MethodProperty::Static {
                    self.process_method_storage_class(&mut t)?;
                }
                self.get_function(&mut t)?;
                Ok(t)
            }
            SymbolType::GlobalFunction => {
                self.get_function(&mut t)?;
                Ok(t)
            }
            SymbolType::StaticGuard => {
                let n = self.get_number()?;
                t.n.push(n);
                Ok(t)
            }
            SymbolType::MethodThunk => {
                let n = self.get_number()?;
                t.n.push(n);
                let c = self.cur("method thunk type")?;
                if c != b'A' {
                    // 'A' (flat) is the only known thunk type.
                    return self.bad_code(c, "method thunk type");
                }
                self.advance();
                self.process_calling_convention(&mut t)?;
                Ok(t)
            }
            SymbolType::Unspecified => {
                let c = self.mangled.get(self.offset).copied().unwrap_or(0);
                self.bad_code(c, "symbol type")
            }
        }
    }

    /// Variable types merge into the symbol node itself; the storage class
    /// that follows describes the storage, not the pointee.
    fn get_type_into_symbol(&mut self, t: &mut SymbolTree) -> Result<()> {
        let mut ty = SymbolTree::default();
        self.get_type(&mut ty, false)?;
        // Graft the parsed type onto the symbol without disturbing the
        // symbol-level fields.
        t.simple_code = ty.simple_code;
        t.simple_string = ty.simple_string;
        t.is_pointer = ty.is_pointer;
        t.is_reference = ty.is_reference;
        t.is_refref = ty.is_refref;
        t.is_array = ty.is_array;
        t.dimensions = ty.dimensions;
        t.is_const |= ty.is_const;
        t.is_volatile |= ty.is_volatile;
        t.inner_type = ty.inner_type;
        t.enum_real_type = ty.enum_real_type;
        t.name = ty.name;
        t.is_gc = ty.is_gc;
        t.is_pin = ty.is_pin;
        t.ptr64 = ty.ptr64;
        t.unaligned |= ty.unaligned;
        t.restrict |= ty.restrict;
        Ok(())
    }
}
