//! JSON projections of a demangled [`SymbolTree`].
//!
//! Three renderings are offered: [`convert`], a decorated summary with
//! human-readable labels and the pre-rendered text; [`raw`], the tree
//! verbatim with every non-default field; and [`minimal`], a flat projection
//! of function-shaped symbols that falls back to [`raw`] for everything
//! else.

use demangler::{
    Attributes, Distance, MethodProperty, Scope, SymbolTree, SymbolType, TemplateParameter,
    TextOutput,
};
use serde_json::{json, Map, Value};

fn symbol_type_label(sym: &SymbolTree) -> Option<&'static str> {
    Some(match sym.symbol_type {
        SymbolType::Unspecified => return None,
        SymbolType::StaticClassMember => "static class member",
        SymbolType::GlobalObject => "global object",
        SymbolType::GlobalFunction => "global function",
        SymbolType::ClassMethod => "class method",
        SymbolType::Rtti => "RTTI",
        SymbolType::VTable => "vtable",
        SymbolType::String => "string",
        SymbolType::VtorDisp => "vtordisp",
        SymbolType::StaticGuard => "static guard",
        SymbolType::MethodThunk => "method thunk",
        SymbolType::HexSymbol => "hex symbol",
    })
}

fn scope_label(sym: &SymbolTree) -> Option<&'static str> {
    Some(match sym.scope {
        Scope::Unspecified => return None,
        Scope::Private => "private",
        Scope::Protected => "protected",
        Scope::Public => "public",
    })
}

fn distance_label(sym: &SymbolTree) -> Option<&'static str> {
    Some(match sym.distance {
        Distance::Unspecified => return None,
        Distance::Near => "near",
        Distance::Far => "far",
        Distance::Huge => "huge",
    })
}

fn method_property_label(sym: &SymbolTree) -> Option<&'static str> {
    Some(match sym.method_property {
        MethodProperty::Unspecified => return None,
        MethodProperty::Ordinary => "ordinary",
        MethodProperty::Static => "static",
        MethodProperty::Virtual => "virtual",
        MethodProperty::Thunk => "thunk",
    })
}

fn is_function_shaped(sym: &SymbolTree) -> bool {
    matches!(
        sym.symbol_type,
        SymbolType::GlobalFunction | SymbolType::ClassMethod
    )
}

/// Decorated rendering: labels, a reversed-order namespace list, and the
/// pre-rendered declaration text.
pub fn convert(sym: &SymbolTree, attrs: Attributes) -> Value {
    let mut obj = Map::new();
    if let Some(label) = symbol_type_label(sym) {
        obj.insert("symbol_type".into(), label.into());
    }
    if let Some(label) = scope_label(sym) {
        obj.insert("scope".into(), label.into());
    }

    if is_function_shaped(sym) {
        if let Some(label) = distance_label(sym) {
            obj.insert("distance".into(), label.into());
        }
        if let Some(rv) = sym.retval.as_deref() {
            obj.insert("return_type".into(), convert(rv, attrs));
        }
        obj.insert(
            "calling_convention".into(),
            sym.calling_convention.into(),
        );
    }

    if !sym.name.is_empty() {
        let ns: Vec<Value> = sym.name.iter().rev().map(|part| convert(part, attrs)).collect();
        obj.insert("namespace".into(), ns.into());
    }

    obj.insert(
        "text".into(),
        TextOutput::new(attrs).convert(sym).into(),
    );
    Value::Object(obj)
}

/// The tree verbatim: every non-default field, recursively.
pub fn raw(sym: &SymbolTree) -> Value {
    let mut obj = Map::new();

    let mut add_bool = |name: &str, val: bool| {
        if val {
            obj.insert(name.into(), Value::Bool(true));
        }
    };
    add_bool("is_const", sym.is_const);
    add_bool("is_volatile", sym.is_volatile);
    add_bool("is_reference", sym.is_reference);
    add_bool("is_pointer", sym.is_pointer);
    add_bool("is_array", sym.is_array);
    add_bool("is_embedded", sym.is_embedded);
    add_bool("is_func", sym.is_func);
    add_bool("is_based", sym.is_based);
    add_bool("is_member", sym.is_member);
    add_bool("is_anonymous", sym.is_anonymous);
    add_bool("is_refref", sym.is_refref);
    add_bool("unaligned", sym.unaligned);
    add_bool("restrict", sym.restrict);
    add_bool("is_gc", sym.is_gc);
    add_bool("is_pin", sym.is_pin);
    add_bool("is_ctor", sym.is_ctor);
    add_bool("is_dtor", sym.is_dtor);
    add_bool("extern_c", sym.extern_c);
    add_bool("is_exported", sym.is_exported);

    if !sym.dimensions.is_empty() {
        obj.insert("dimensions".into(), json!(sym.dimensions));
    }
    if let Some(label) = symbol_type_label(sym) {
        obj.insert("symbol_type".into(), label.into());
    }
    if let Some(label) = distance_label(sym) {
        obj.insert("distance".into(), label.into());
    }
    if sym.ptr64 != 0 {
        obj.insert("ptr64".into(), json!(sym.ptr64));
    }
    if let Some(inner) = sym.inner_type.as_deref() {
        obj.insert("inner_type".into(), raw(inner));
    }
    if let Some(real) = sym.enum_real_type.as_deref() {
        obj.insert("enum_real_type".into(), raw(real));
    }
    if !sym.simple_string.is_empty() {
        obj.insert("simple_string".into(), sym.simple_string.clone().into());
    }
    if sym.simple_code != demangler::Code::Undefined {
        obj.insert(
            "simple_code".into(),
            demangler::code_string(sym.simple_code).into(),
        );
    }
    if !sym.name.is_empty() {
        // Outermost first, as a reader expects.
        let parts: Vec<Value> = sym.name.iter().rev().map(raw).collect();
        obj.insert("name".into(), parts.into());
    }
    if !sym.com_interface.is_empty() {
        let parts: Vec<Value> = sym.com_interface.iter().map(raw).collect();
        obj.insert("com_interface".into(), parts.into());
    }
    if !sym.template_parameters.is_empty() {
        let params: Vec<Value> = sym
            .template_parameters
            .iter()
            .flatten()
            .map(|param| match param {
                TemplateParameter::Type(t) => json!({ "type": raw(t) }),
                TemplateParameter::Pointer(t) => json!({ "type": raw(t), "pointer": true }),
                TemplateParameter::Constant(v) => json!({ "constant_value": v }),
            })
            .collect();
        obj.insert("template_parameters".into(), params.into());
    }
    if let Some(label) = scope_label(sym) {
        obj.insert("scope".into(), label.into());
    }
    if let Some(label) = method_property_label(sym) {
        obj.insert("method_property".into(), label.into());
    }
    if !sym.calling_convention.is_empty() {
        obj.insert(
            "calling_convention".into(),
            sym.calling_convention.into(),
        );
    }
    if !sym.instance_name.is_empty() {
        let parts: Vec<Value> = sym.instance_name.iter().map(raw).collect();
        obj.insert("instance_name".into(), parts.into());
    }
    if let Some(rv) = sym.retval.as_deref() {
        obj.insert("retval".into(), raw(rv));
    }
    if !sym.args.is_empty() {
        let args: Vec<Value> = sym.args.iter().map(raw).collect();
        obj.insert("args".into(), args.into());
    }
    if !sym.n.is_empty() {
        obj.insert("n".into(), json!(sym.n));
    }

    Value::Object(obj)
}

/// Function-shaped symbols projected flat; everything else falls back to
/// [`raw`].
pub fn minimal(sym: &SymbolTree, attrs: Attributes) -> Value {
    if !is_function_shaped(sym) {
        return raw(sym);
    }

    let text = TextOutput::new(attrs);
    let mut obj = Map::new();
    if let Some(label) = symbol_type_label(sym) {
        obj.insert("symbol_type".into(), label.into());
    }
    if let Some(label) = scope_label(sym) {
        obj.insert("scope".into(), label.into());
    }
    if !sym.calling_convention.is_empty() {
        obj.insert(
            "calling_convention".into(),
            sym.calling_convention.into(),
        );
    }
    if let Some(label) = distance_label(sym) {
        obj.insert("distance".into(), label.into());
    }

    let mut add_string = |name: &str, val: String| {
        if !val.is_empty() {
            obj.insert(name.into(), val.into());
        }
    };
    add_string("class_name", text.class_name(sym));
    add_string("function_name", text.method_name(sym));
    add_string("function_signature", text.method_signature(sym));
    // Ctors and dtors have an empty return type; the key is omitted.
    if let Some(rv) = sym.retval.as_deref() {
        add_string("return_type", text.convert(rv));
    }

    let args: Vec<Value> = sym
        .args
        .iter()
        .map(|arg| text.convert(arg).into())
        .collect();
    obj.insert("args".into(), args.into());

    let is_ctor = sym.name.iter().any(|part| part.is_ctor);
    let is_dtor = sym.name.iter().any(|part| part.is_dtor);
    if is_ctor {
        obj.insert("is_ctor".into(), Value::Bool(true));
    }
    if is_dtor {
        obj.insert("is_dtor".into(), Value::Bool(true));
    }

    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use demangler::demangle;

    #[test]
    fn minimal_projects_methods() {
        let tree = demangle("?foo@Bar@@SAHH@Z").unwrap();
        let value = minimal(&tree, Attributes::undname());
        assert_eq!(value["symbol_type"], "class method");
        assert_eq!(value["scope"], "public");
        assert_eq!(value["class_name"], "Bar");
        assert_eq!(value["function_name"], "foo");
        assert_eq!(value["calling_convention"], "__cdecl");
        assert_eq!(value["return_type"], "int");
        assert_eq!(value["args"], json!(["int"]));
    }

    #[test]
    fn minimal_marks_constructors() {
        let tree = demangle("??0Foo@@QAE@XZ").unwrap();
        let value = minimal(&tree, Attributes::undname());
        assert_eq!(value["is_ctor"], true);
        assert!(value.get("is_dtor").is_none());
        // Constructors have no return type to report.
        assert!(value.get("return_type").is_none());
    }

    #[test]
    fn minimal_falls_back_to_raw() {
        let tree = demangle("?x@@3HA").unwrap();
        let value = minimal(&tree, Attributes::undname());
        // Raw projection: no pre-rendered fields, the simple code instead.
        assert_eq!(value["symbol_type"], "global object");
        assert_eq!(value["simple_code"], "int");
        assert!(value.get("function_signature").is_none());
    }

    #[test]
    fn convert_carries_text_and_reversed_namespace() {
        let tree = demangle("?f@X@@QAEXV1@@Z").unwrap();
        let value = convert(&tree, Attributes::undname());
        assert_eq!(value["text"], "public: void __thiscall X::f(class X)");
        let ns = value["namespace"].as_array().unwrap();
        assert_eq!(ns[0]["text"], "X");
        assert_eq!(ns[1]["text"], "f");
    }

    #[test]
    fn raw_omits_defaults() {
        let tree = demangle("?x@@3HA").unwrap();
        let value = raw(&tree);
        assert_eq!(value["simple_code"], "int");
        assert!(value.get("is_const").is_none());
        assert!(value.get("args").is_none());
        assert_eq!(value["instance_name"][0]["simple_string"], "x");
    }

    #[test]
    fn raw_keeps_template_constants() {
        let tree = demangle("??$f@$0?8@@YAXXZ").unwrap();
        let value = raw(&tree);
        let name = value["name"].as_array().unwrap();
        assert_eq!(name[0]["template_parameters"][0]["constant_value"], -9);
    }
}
