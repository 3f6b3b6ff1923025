use proc_macro::TokenStream;
use quote::quote;

use syn::spanned::Spanned as _;
use syn::{
    Attribute, Data, DeriveInput, Error, FnArg, GenericArgument, ImplItem, ItemImpl, Meta, Pat,
    Path, PathArguments, ReturnType, Type,
};

const INJECT_ATTR: &str = "inject";
const OPTIONS_ATTR: &str = "solder";
const CONSTRUCT_ATTR: &str = "construct";

fn extract_svc_type(ty: &Type) -> Option<Type> {
    if let Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
        && (segment.ident == "Svc" || segment.ident == "Rc")
        && let PathArguments::AngleBracketed(args) = &segment.arguments
        && let Some(GenericArgument::Type(inner)) = args.args.first()
    {
        return Some(inner.clone());
    }
    None
}

fn is_result_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
    {
        return segment.ident == "Result";
    }
    false
}

fn implements_impls(name: &syn::Ident, traits: &[Path]) -> proc_macro2::TokenStream {
    let impls = traits.iter().map(|path| {
        quote! {
            impl ::solder::Implements<dyn #path> for #name {
                fn as_service(svc: ::solder::Svc<Self>) -> ::solder::Svc<dyn #path> {
                    svc
                }
            }
        }
    });
    quote! { #(#impls)* }
}

/// Derive macro for the Injectable trait.
///
/// Handles field injection (`#[inject]` markers) and struct-level options
/// (`#[solder(implements(..), default)]`). Constructor and method injection
/// live on the `#[injectable]` attribute macro instead.
#[proc_macro_derive(Injectable, attributes(inject, solder))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    handle_derive_injectable(input)
}

#[derive(Default)]
struct StructOptions {
    implements: Vec<Path>,
    default_constructor: bool,
}

fn parse_struct_options(attrs: &[Attribute]) -> syn::Result<StructOptions> {
    let mut options = StructOptions::default();
    for attr in attrs {
        if !attr.path().is_ident(OPTIONS_ATTR) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("implements") {
                meta.parse_nested_meta(|inner| {
                    options.implements.push(inner.path.clone());
                    Ok(())
                })
            } else if meta.path.is_ident("default") {
                options.default_constructor = true;
                Ok(())
            } else {
                Err(meta.error("expected `implements(..)` or `default`"))
            }
        })?;
    }
    Ok(options)
}

fn has_marker(attrs: &[Attribute], marker: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(marker))
}

fn handle_derive_injectable(input: DeriveInput) -> TokenStream {
    let name = &input.ident;
    let options = match parse_struct_options(&input.attrs) {
        Ok(options) => options,
        Err(error) => return TokenStream::from(error.to_compile_error()),
    };
    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return TokenStream::from(
                Error::new(name.span(), "Only structs are supported").to_compile_error(),
            );
        }
    };

    let mut member_stmts = Vec::new();
    match fields {
        syn::Fields::Named(fields) => {
            for field in &fields.named {
                if !has_marker(&field.attrs, INJECT_ATTR) {
                    continue;
                }
                let field_ident = field.ident.as_ref().unwrap();
                let Some(inner) = extract_svc_type(&field.ty) else {
                    return TokenStream::from(
                        Error::new(
                            field.ty.span(),
                            format!("#[{INJECT_ATTR}] fields must be of type Svc<T>"),
                        )
                        .to_compile_error(),
                    );
                };
                member_stmts.push(quote! {
                    self.#field_ident = cx.resolve_member::<#inner>(
                        &::solder::InjectionContext::field::<Self, #inner>(
                            stringify!(#field_ident),
                        ),
                    )?;
                });
            }
        }
        syn::Fields::Unnamed(_) => {
            return TokenStream::from(
                Error::new(name.span(), "Tuple structs are not supported").to_compile_error(),
            );
        }
        syn::Fields::Unit => {}
    }

    let constructors_fn = if options.default_constructor {
        quote! {
            fn constructors() -> ::std::vec::Vec<::solder::Constructor<Self>> {
                ::std::vec![::solder::Constructor::new(
                    "default",
                    ::std::vec::Vec::new(),
                    |_cx| Ok(<Self as ::std::default::Default>::default()),
                )]
            }
        }
    } else {
        quote! {}
    };
    let members_fn = if member_stmts.is_empty() {
        quote! {}
    } else {
        quote! {
            fn inject_members(
                &mut self,
                cx: &mut ::solder::Resolution,
            ) -> ::std::result::Result<(), ::solder::ResolveError> {
                #(#member_stmts)*
                Ok(())
            }
        }
    };
    let implements = implements_impls(name, &options.implements);

    quote! {
        impl ::solder::Injectable for #name {
            #constructors_fn
            #members_fn
        }

        #implements
    }
    .into()
}

/// Attribute macro for impl blocks with injection constructors
/// (`#[construct]`, `#[construct(designated)]`) and injection methods
/// (`#[inject]`).
#[proc_macro_attribute]
pub fn injectable(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut implements: Vec<Path> = Vec::new();
    if !attr.is_empty() {
        let parser = syn::meta::parser(|meta| {
            if meta.path.is_ident("implements") {
                meta.parse_nested_meta(|inner| {
                    implements.push(inner.path.clone());
                    Ok(())
                })
            } else {
                Err(meta.error("expected `implements(..)`"))
            }
        });
        syn::parse_macro_input!(attr with parser);
    }
    if let Ok(item_impl) = syn::parse::<ItemImpl>(item) {
        return handle_injectable_impl(item_impl, implements);
    }
    TokenStream::from(
        Error::new(
            proc_macro2::Span::call_site(),
            "#[injectable] can only be applied to impl blocks",
        )
        .to_compile_error(),
    )
}

fn constructor_marker(attrs: &[Attribute]) -> syn::Result<Option<bool>> {
    for attr in attrs {
        if !attr.path().is_ident(CONSTRUCT_ATTR) {
            continue;
        }
        let mut designated = false;
        if let Meta::List(_) = &attr.meta {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("designated") {
                    designated = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `designated`"))
                }
            })?;
        }
        return Ok(Some(designated));
    }
    Ok(None)
}

struct MethodParam {
    ident: syn::Ident,
    inner: Type,
}

fn method_params(method: &syn::ImplItemFn, expect_receiver: bool) -> syn::Result<Vec<MethodParam>> {
    let mut params = Vec::new();
    for fn_arg in &method.sig.inputs {
        match fn_arg {
            FnArg::Receiver(receiver) => {
                if !expect_receiver {
                    return Err(Error::new(
                        receiver.span(),
                        "constructor methods cannot have a self parameter",
                    ));
                }
            }
            FnArg::Typed(pat_type) => {
                let Pat::Ident(pat_ident) = pat_type.pat.as_ref() else {
                    return Err(Error::new(
                        pat_type.pat.span(),
                        "only simple bindings are supported",
                    ));
                };
                let Some(inner) = extract_svc_type(&pat_type.ty) else {
                    return Err(Error::new(
                        pat_type.ty.span(),
                        "injected parameters must be of type Svc<T>",
                    ));
                };
                params.push(MethodParam {
                    ident: pat_ident.ident.clone(),
                    inner,
                });
            }
        }
    }
    Ok(params)
}

fn handle_injectable_impl(input: ItemImpl, implements: Vec<Path>) -> TokenStream {
    if input.trait_.is_some() {
        return TokenStream::from(
            Error::new(input.span(), "Trait impls are not supported").to_compile_error(),
        );
    }
    let self_ty = &input.self_ty;
    let name = match self_ty.as_ref() {
        Type::Path(type_path) => type_path.path.segments.last().unwrap().ident.clone(),
        _ => {
            return TokenStream::from(
                Error::new(self_ty.span(), "Unsupported self type").to_compile_error(),
            );
        }
    };

    let mut constructor_exprs = Vec::new();
    let mut member_stmts = Vec::new();

    for item in &input.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        let method_ident = &method.sig.ident;
        let marker = match constructor_marker(&method.attrs) {
            Ok(marker) => marker,
            Err(error) => return TokenStream::from(error.to_compile_error()),
        };
        if let Some(designated) = marker {
            if method.sig.receiver().is_some() {
                return TokenStream::from(
                    Error::new(
                        method.sig.span(),
                        "constructor methods cannot have a self parameter",
                    )
                    .to_compile_error(),
                );
            }
            let params = match method_params(method, false) {
                Ok(params) => params,
                Err(error) => return TokenStream::from(error.to_compile_error()),
            };
            let is_result = match &method.sig.output {
                ReturnType::Default => {
                    return TokenStream::from(
                        Error::new(method.sig.span(), "constructor methods must return Self")
                            .to_compile_error(),
                    );
                }
                ReturnType::Type(_, ty) => is_result_type(ty),
            };
            let param_specs = params.iter().map(|param| {
                let ident = &param.ident;
                let inner = &param.inner;
                quote! { ::solder::Param::of::<#inner>(stringify!(#ident)) }
            });
            let arg_inits = params.iter().map(|param| {
                let ident = &param.ident;
                let inner = &param.inner;
                quote! {
                    let #ident = cx.resolve_argument::<#inner>(
                        &::solder::InjectionContext::constructor_parameter::<Self, #inner>(
                            stringify!(#method_ident),
                            stringify!(#ident),
                        ),
                    )?;
                }
            });
            let arg_names = params.iter().map(|param| &param.ident);
            let invoke = if is_result {
                quote! {
                    Self::#method_ident(#(#arg_names),*).map_err(|error| {
                        ::solder::ResolveError::constructor_failed::<Self>(
                            stringify!(#method_ident),
                            error.into(),
                        )
                    })
                }
            } else {
                quote! { Ok(Self::#method_ident(#(#arg_names),*)) }
            };
            let declare = if designated {
                quote! { ::solder::Constructor::designated }
            } else {
                quote! { ::solder::Constructor::new }
            };
            constructor_exprs.push(quote! {
                #declare(
                    stringify!(#method_ident),
                    ::std::vec![#(#param_specs),*],
                    |cx| {
                        #(#arg_inits)*
                        #invoke
                    },
                )
            });
        } else if has_marker(&method.attrs, INJECT_ATTR) {
            let Some(receiver) = method.sig.receiver() else {
                return TokenStream::from(
                    Error::new(
                        method.sig.span(),
                        "injection methods must take &mut self",
                    )
                    .to_compile_error(),
                );
            };
            if receiver.mutability.is_none() || receiver.reference.is_none() {
                return TokenStream::from(
                    Error::new(receiver.span(), "injection methods must take &mut self")
                        .to_compile_error(),
                );
            }
            let params = match method_params(method, true) {
                Ok(params) => params,
                Err(error) => return TokenStream::from(error.to_compile_error()),
            };
            let arg_inits = params.iter().map(|param| {
                let ident = &param.ident;
                let inner = &param.inner;
                quote! {
                    let #ident = cx.resolve_member::<#inner>(
                        &::solder::InjectionContext::method_parameter::<Self, #inner>(
                            stringify!(#method_ident),
                            stringify!(#ident),
                        ),
                    )?;
                }
            });
            let arg_names = params.iter().map(|param| &param.ident);
            member_stmts.push(quote! {
                {
                    #(#arg_inits)*
                    self.#method_ident(#(#arg_names),*);
                }
            });
        }
    }

    // Strip the marker attributes from the emitted impl.
    let mut cleaned_input = input.clone();
    for item in &mut cleaned_input.items {
        if let ImplItem::Fn(method) = item {
            method.attrs.retain(|attr| {
                !attr.path().is_ident(CONSTRUCT_ATTR) && !attr.path().is_ident(INJECT_ATTR)
            });
        }
    }

    let constructors_fn = if constructor_exprs.is_empty() {
        quote! {}
    } else {
        quote! {
            fn constructors() -> ::std::vec::Vec<::solder::Constructor<Self>> {
                ::std::vec![#(#constructor_exprs),*]
            }
        }
    };
    let members_fn = if member_stmts.is_empty() {
        quote! {}
    } else {
        quote! {
            fn inject_members(
                &mut self,
                cx: &mut ::solder::Resolution,
            ) -> ::std::result::Result<(), ::solder::ResolveError> {
                #(#member_stmts)*
                Ok(())
            }
        }
    };
    let implements = implements_impls(&name, &implements);

    quote! {
        #cleaned_input

        impl ::solder::Injectable for #self_ty {
            #constructors_fn
            #members_fn
        }

        #implements
    }
    .into()
}
