//! End-to-end demangling tests: mangled symbol in, declaration text out.
#![cfg(test)]

use crate::ast::{MethodProperty, Scope, SymbolType};
use crate::codes::Code;
use crate::{demangle, Attributes, TextOutput};

macro_rules! eq {
    ($mangled:literal => $demangled:literal) => {
        eq!(Attributes::undname(), $mangled => $demangled)
    };
    ($attrs:expr, $mangled:literal => $demangled:literal) => {
        let tree = demangle($mangled)
            .unwrap_or_else(|e| panic!("demangling '{}' failed: {e}", $mangled));
        assert_eq!(TextOutput::new($attrs).convert(&tree), $demangled);
    };
}

macro_rules! fails {
    ($mangled:literal, $category:literal at $offset:literal) => {
        let err = demangle($mangled).expect_err(concat!($mangled, " should not demangle"));
        assert_eq!(err.category, $category);
        assert_eq!(err.offset, $offset);
    };
}

#[test]
fn global_int() {
    eq!("?x@@3HA" => "int x");
}

#[test]
fn global_int_structure() {
    let tree = demangle("?x@@3HA").unwrap();
    assert_eq!(tree.symbol_type, SymbolType::GlobalObject);
    assert_eq!(tree.simple_code, Code::Int);
    assert_eq!(tree.instance_name.len(), 1);
    assert_eq!(tree.instance_name[0].simple_string, "x");
}

#[test]
fn global_function_structure() {
    let tree = demangle("?x@@YAXMH@Z").unwrap();
    assert_eq!(tree.symbol_type, SymbolType::GlobalFunction);
    assert_eq!(tree.calling_convention, "__cdecl");
    assert_eq!(tree.retval.as_ref().unwrap().simple_code, Code::Void);
    let args: Vec<Code> = tree.args.iter().map(|a| a.simple_code).collect();
    assert_eq!(args, [Code::Float, Code::Int]);

    eq!("?x@@YAXMH@Z" => "void __cdecl x(float,int)");
}

#[test]
fn constructor() {
    eq!("??0Foo@@QAE@XZ" => "public: __thiscall Foo::Foo(void)");
}

#[test]
fn destructor() {
    eq!("??1Foo@@QAE@XZ" => "public: __thiscall Foo::~Foo(void)");
}

#[test]
fn vftable() {
    eq!("??_7type_info@@6B@" => "const type_info::`vftable'");
}

#[test]
fn vftable_for_interfaces() {
    eq!("??_7name0@name1@@6Bx@xx@@y@yy@@@" =>
        "const name1::name0::`vftable'{for `xx::x's `yy::y'}");
}

#[test]
fn static_method() {
    eq!("?foo@Bar@@SAHH@Z" => "public: static int __cdecl Bar::foo(int)");

    let tree = demangle("?foo@Bar@@SAHH@Z").unwrap();
    assert_eq!(tree.scope, Scope::Public);
    assert_eq!(tree.method_property, MethodProperty::Static);
}

#[test]
fn templated_function_with_backref() {
    eq!(Attributes::pretty(), "??$make@H@std@@YA?AV?$vector@H@1@H@Z" =>
        "class std::vector<int> __cdecl std::make<int>(int)");
}

#[test]
fn string_constant() {
    eq!("??_C@_0L@KNPIOOOO@Hello?5World?$AA@" => "`string'");
}

#[test]
fn string_constant_verbose() {
    eq!(Attributes::pretty(), "??_C@_0L@KNPIOOOO@Hello?5World?$AA@" =>
        "const char[12] = \"Hello World\\0\"");

    let tree = demangle("??_C@_0L@KNPIOOOO@Hello?5World?$AA@").unwrap();
    assert_eq!(tree.symbol_type, SymbolType::String);
    assert_eq!(tree.n, [11]);
    assert_eq!(tree.name[0].simple_string, "Hello World");
}

#[test]
fn string_constant_multibyte() {
    eq!(Attributes::pretty(), "??_C@_13KDLDGPGJ@?$AA?5?$AA?$AA@" =>
        "const char16_t[3] = \" \\0\"");
}

#[test]
fn anonymous_namespace() {
    eq!(Attributes::pretty(), "?x@?A0x12345@@3HA" => "int `anonymous namespace 0x12345'::x");
    eq!("?x@?A0x12345@@3HA" => "int `anonymous namespace'::x");
}

#[test]
fn numbered_namespace() {
    eq!("?x@?1@3HA" => "int `2'::x");
}

#[test]
fn method_taking_own_class() {
    eq!("?f@X@@QAEXV1@@Z" => "public: void __thiscall X::f(class X)");
}

#[test]
fn reference_argument() {
    eq!("??4Foo@@QAEAAV0@ABV0@@Z" =>
        "public: class Foo & __thiscall Foo::operator=(const class Foo &)");
}

#[test]
fn conversion_operator() {
    eq!("??BFoo@@QAEHXZ" => "public: __thiscall Foo::operator int(void)");
}

#[test]
fn operator_new_delete() {
    eq!("??2@YAPAXI@Z" => "void * __cdecl operator new(unsigned int)");
    eq!("??3@YAXPAX@Z" => "void __cdecl operator delete(void *)");
}

#[test]
fn pointer_to_array() {
    eq!("?x@@3PAY02HA" => "int (* x)[3]");
}

#[test]
fn function_pointer() {
    eq!("?fp@@3P6AHM@ZA" => "int (__cdecl* fp)(float)");
}

#[test]
fn enum_variable() {
    eq!("?e@@3W4Color@@A" => "enum Color e");
}

#[test]
fn wide_string_pointer() {
    eq!("?s@@3PA_WA" => "wchar_t * s");
}

#[test]
fn nullptr_argument() {
    eq!("?f@@YAX$$T@Z" => "void __cdecl f(std::nullptr_t)");
}

#[test]
fn variadic_function() {
    eq!("?printf_like@@YAHPBDZZ" => "int __cdecl printf_like(const char *,...)");
}

#[test]
fn template_integer_constants() {
    eq!("??$f@$0A@@@YAXXZ" => "void __cdecl f<0>(void)");
    eq!("??$f@$0?8@@YAXXZ" => "void __cdecl f<-9>(void)");
    eq!("??$f@$0PPPPPPPP@@@YAXXZ" => "void __cdecl f<4294967295>(void)");
}

#[test]
fn template_symbol_pointer_constant() {
    eq!(Attributes::pretty(), "??$f@$1?x@@3HA@@YAXXZ" => "void __cdecl f<&int x>(void)");
}

#[test]
fn rtti_type_descriptor() {
    eq!("??_R0?AVFoo@@@8" => "class Foo `RTTI Type Descriptor'");
}

#[test]
fn rtti_base_class_descriptor() {
    eq!("??_R1A@?0A@EA@Foo@@8" => "Foo::`RTTI Base Class Descriptor at (0,-1,0,64)'");
}

#[test]
fn rtti_alike_descriptor_prefix() {
    // A '.'-prefixed input parses as a bare return type.
    eq!(".?AVFoo@@" => "class Foo");
}

#[test]
fn rtti_complete_object_locator() {
    eq!("??_R4Foo@@6B@" => "const Foo::`RTTI Complete Object Locator'");
}

#[test]
fn basic_string_backrefs() {
    eq!(Attributes::pretty(),
        ".?AV?$basic_string@DU?$char_traits@D@std@@V?$allocator@D@2@@std@@" =>
        "class std::basic_string<char, struct std::char_traits<char>, class std::allocator<char> >");
}

#[test]
fn local_static_guard() {
    eq!("??_B?1??f@@YAHXZ@51" =>
        "`int __cdecl f(void)'::`2'::`local static guard'{2}'");
}

#[test]
fn local_static_guard_unbroken() {
    eq!(Attributes::pretty(), "??_B?1??f@@YAHXZ@51" =>
        "`int __cdecl f(void)'::`2'::`local static guard'{2}");
}

#[test]
fn method_thunk_vcall() {
    eq!("??_9Base@@$B7AE" => "[thunk]: __thiscall Base::`vcall'{8,{flat}} }'");
}

#[test]
fn thunk_adjustor() {
    eq!("?f@C@@WBA@AEXXZ" => "[thunk]: public: void __thiscall C::f`adjustor{16}' (void)");
}

#[test]
fn vtordisp() {
    eq!("?f@C@@$4PPPPPPPM@A@AEXXZ" =>
        "[thunk]: public: void __thiscall C::f`vtordisp{4294967292,0}' (void)");
}

#[test]
fn extern_c_prefix() {
    eq!("?f@@$$J0YAXXZ" => "extern \"C\" void __cdecl f(void)");
}

#[test]
fn ptr64_on_pointer_and_storage() {
    eq!("?x@@3PEAHEA" => "int * __ptr64 __ptr64 x");
}

#[test]
fn ptr64_method() {
    eq!("??0klass@@QEAA@XZ" => "public: __cdecl klass::klass(void) __ptr64");
}

#[test]
fn fixed_width_types() {
    eq!("?x@@3_JA" => "__int64 x");
    eq!(Attributes::pretty(), "?x@@3_JA" => "std::int64_t x");
    eq!("?x@@3_KA" => "unsigned __int64 x");
}

#[test]
fn static_member() {
    eq!("?count@Counter@@2HA" => "public: static int Counter::count");
    eq!("?count@Counter@@0HA" => "private: static int Counter::count");
}

#[test]
fn virtual_method() {
    eq!("?f@C@@UAEXXZ" => "public: virtual void __thiscall C::f(void)");
}

#[test]
fn far_function() {
    eq!("?f@@ZAXXZ" => "void __cdecl far f(void)");
}

#[test]
fn type_backref_in_args() {
    eq!("?f@@YAXUA@@0@Z" => "void __cdecl f(struct A,struct A)");
}

#[test]
fn name_backref_out_of_range() {
    eq!("?f@@YAXV9@@Z" => "void __cdecl f(class ref#9)");
}

#[test]
fn name_stack_caps_at_ten() {
    // Twelve fragments parse, but only the first ten are memorized; 9 still
    // resolves to the tenth.
    eq!("?f@a@b@c@d@e@g@h@i@j@k@l@@QAEXV9@@Z" =>
        "public: void __thiscall l::k::j::i::h::g::e::d::c::b::a::f(class j)");
}

#[test]
fn dynamic_initializer() {
    eq!("??__Ex@@YAXXZ" => "void __cdecl `dynamic initializer for 'x''(void)");
}

#[test]
fn dynamic_atexit_destructor() {
    eq!("??__Fx@@YAXXZ" => "void __cdecl `dynamic atexit destructor for 'x''(void)");
}

#[test]
fn embedded_symbol_in_name() {
    eq!("?x@?1??f@@YAHXZ@4HA" => "int `int __cdecl f(void)'::`2'::x");
}

#[test]
fn rendering_is_deterministic() {
    let tree = demangle("??$make@H@std@@YA?AV?$vector@H@1@H@Z").unwrap();
    let out = TextOutput::new(Attributes::pretty());
    assert_eq!(out.convert(&tree), out.convert(&tree));
}

#[test]
fn fragment_renderings() {
    let tree = demangle("?foo@Bar@@SAHH@Z").unwrap();
    let out = TextOutput::new(Attributes::undname());
    assert_eq!(out.class_name(&tree), "Bar");
    assert_eq!(out.method_name(&tree), "foo");
    assert_eq!(out.method_signature(&tree), "public: static int __cdecl (int)");
}

#[test]
fn attribute_wire_form() {
    assert_eq!(Attributes::BROKEN_UNDNAME.bits(), 0x8000_0000);
    assert!(Attributes::undname().contains(Attributes::BROKEN_UNDNAME));
    assert!(!Attributes::pretty().contains(Attributes::BROKEN_UNDNAME));
    assert_eq!(Attributes::explain().len(), 15);
}

#[test]
fn attribute_set_unset() {
    let mut attrs = Attributes::pretty();
    attrs.remove(Attributes::SPACE_AFTER_COMMA);
    assert!(!attrs.contains(Attributes::SPACE_AFTER_COMMA));
    attrs.insert(Attributes::SPACE_AFTER_COMMA);
    assert!(attrs.contains(Attributes::SPACE_AFTER_COMMA));

    eq!(attrs, "?x@@YAXMH@Z" => "void __cdecl x(float, int)");
}

#[test]
fn primitive_argument_sweep() {
    eq!("?f@@YAXCDEFGHIJKM_N@Z" =>
        "void __cdecl f(signed char,char,unsigned char,short,unsigned short,int,unsigned int,long,unsigned long,float,bool)");
}

#[test]
fn floating_globals() {
    eq!("?d@@3NA" => "double d");
    eq!("?ld@@3OA" => "long double ld");
}

#[test]
fn volatile_global() {
    eq!("?x@@3HC" => "volatile int x");
}

#[test]
fn const_pointer_to_const() {
    eq!("?x@@3PBHB" => "const int * const x");
}

#[test]
fn pointer_to_pointer() {
    eq!("?f@@YAXPAPAH@Z" => "void __cdecl f(int * *)");
}

#[test]
fn char_pointer_global() {
    eq!("?s@@3PADA" => "char * s");
}

#[test]
fn nested_namespaces() {
    eq!("?x@inner@outer@@3HA" => "int outer::inner::x");
}

#[test]
fn multi_dimensional_array() {
    eq!("?a@@3PAY136HA" => "int (* a)[4][7]");
}

#[test]
fn comparison_operator() {
    eq!("??8Foo@@QAEHABV0@@Z" =>
        "public: int __thiscall Foo::operator==(const class Foo &)");
}

#[test]
fn index_operator() {
    eq!("??AFoo@@QAEHH@Z" => "public: int __thiscall Foo::operator[](int)");
}

#[test]
fn plus_operator_returning_class() {
    eq!("??HFoo@@QAE?AV0@ABV0@@Z" =>
        "public: class Foo __thiscall Foo::operator+(const class Foo &)");
}

#[test]
fn private_copy_constructor() {
    eq!("??0Foo@@AAE@ABV0@@Z" => "private: __thiscall Foo::Foo(const class Foo &)");
}

#[test]
fn const_method() {
    eq!("?f@C@@QBEHXZ" => "public: int __thiscall C::f(void) const");
}

#[test]
fn ref_qualified_method() {
    eq!("?f@C@@QGAEXXZ" => "public: void __thiscall C::f(void) &");
}

#[test]
fn member_function_pointer_argument() {
    eq!("?f@@YAXP8Cls@@AEXXZ@Z" =>
        "void __cdecl f(void (__thiscall Cls::*)(void))");
}

#[test]
fn struct_returned_by_value() {
    eq!("?f@@YA?AUS@@XZ" => "struct S __cdecl f(void)");
}

#[test]
fn template_with_two_parameters() {
    eq!("??$f@HD@@YAXXZ" => "void __cdecl f<int,char>(void)");
}

#[test]
fn template_sixteen_digit_constant() {
    eq!("??$f@$0BAAAAAAAAAAAAAAAA@@@YAXXZ" => "void __cdecl f<1152921504606846976>(void)");
    eq!("??$f@$0?IAAAAAAA@@@YAXXZ" => "void __cdecl f<-2147483648>(void)");
}

#[test]
fn type_stack_holds_ten_entries() {
    eq!("?f@@YAXUA0@@UA1@@UA2@@UA3@@UA4@@UA5@@UA6@@UA7@@UA8@@UA9@@09@Z" =>
        "void __cdecl f(struct A0,struct A1,struct A2,struct A3,struct A4,struct A5,struct A6,struct A7,struct A8,struct A9,struct A0,struct A9)");
}

#[test]
fn rejects_non_symbols() {
    fails!("x", "symbol" at 0);
    fails!("_f", "symbol" at 0);
    fails!("", "symbol" at 0);
}

#[test]
fn rejects_bad_storage_class() {
    fails!("?x@@3H#", "storage class" at 6);
}

#[test]
fn rejects_bad_type() {
    fails!("?x@@3!A", "type" at 5);
}

#[test]
fn rejects_truncated_input() {
    let err = demangle("?x@@7").unwrap_err();
    assert_eq!(err.byte, 0);
    assert_eq!(err.offset, 5);
    assert!(err.to_string().contains("ends abruptly"));
}

#[test]
fn rejects_bad_literal_bytes() {
    fails!("?x y@@3HA", "literal" at 2);
}

#[test]
fn rejects_overlong_number() {
    fails!("??$f@$0AAAAAAAAAAAAAAAAA@@@YAXXZ", "number" at 24);
}

#[test]
fn error_messages_name_the_byte() {
    let err = demangle("?x@@3H#").unwrap_err();
    assert_eq!(err.byte, b'#');
    assert_eq!(err.to_string(), "unrecognized storage class code '#' at offset 6");
}
