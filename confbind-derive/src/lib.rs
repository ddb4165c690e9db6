//! Derive macro for `confbind::Configuration`.
//!
//! Reads `#[config(...)]` attributes off every named field and emits the
//! schema description plus index-based field accessors the binding engine
//! walks at runtime.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, Visibility};

#[proc_macro_derive(Configuration, attributes(config))]
pub fn derive_configuration(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Annotations collected from the `#[config(...)]` attributes of one field.
#[derive(Default)]
struct FieldAttrs {
    tags: Vec<(String, String)>,
    default: Option<String>,
    required: bool,
    ignored: bool,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Configuration cannot be derived for generic types",
        ));
    }

    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Configuration can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Configuration can only be derived for structs",
            ))
        }
    };

    let ident = &input.ident;
    let name = ident.to_string();
    let count = named.len();

    let mut descriptors = Vec::with_capacity(count);
    let mut getters = Vec::with_capacity(count);
    let mut setters = Vec::with_capacity(count);

    for (index, field) in named.iter().enumerate() {
        let member = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let field_name = member.unraw().to_string();
        let ty = &field.ty;
        let attrs = parse_field_attrs(field)?;

        // Ignored fields never reach the engine, so their type need not implement `Field`.
        let field_type = if attrs.ignored {
            quote!(::confbind::FieldType::scalar(::confbind::FieldKind::Unsupported(
                ::core::any::type_name::<#ty>()
            )))
        } else {
            quote!(<#ty as ::confbind::Field>::field_type())
        };

        let tags: Vec<_> = attrs
            .tags
            .iter()
            .map(|(tag, value)| quote!(.tag(#tag, #value)))
            .collect();
        let default = attrs.default.as_ref().map(|literal| quote!(.default_value(#literal)));
        let required = attrs.required.then(|| quote!(.required(true)));
        let ignored = attrs.ignored.then(|| quote!(.ignored(true)));
        let exported =
            (!matches!(field.vis, Visibility::Public(_))).then(|| quote!(.exported(false)));

        descriptors.push(quote! {
            ::confbind::FieldDescriptor::new(#field_name, #field_type)
                #(#tags)* #default #required #ignored #exported
        });

        if !attrs.ignored {
            getters.push(quote! {
                #index => ::core::option::Option::Some(&self.#member as &dyn ::confbind::Field),
            });
            setters.push(quote! {
                #index => ::core::option::Option::Some(&mut self.#member as &mut dyn ::confbind::Field),
            });
        }
    }

    Ok(quote! {
        #[automatically_derived]
        impl ::confbind::Configuration for #ident {
            fn describe() -> ::confbind::Schema {
                ::confbind::Schema::new(#name, ::std::vec![#(#descriptors),*])
            }

            fn schema(&self) -> ::confbind::Schema {
                <Self as ::confbind::Configuration>::describe()
            }

            fn field(&self, index: usize) -> ::core::option::Option<&dyn ::confbind::Field> {
                match index {
                    #(#getters)*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_mut(
                &mut self,
                index: usize,
            ) -> ::core::option::Option<&mut dyn ::confbind::Field> {
                match index {
                    #(#setters)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        #[automatically_derived]
        impl ::confbind::Field for #ident {
            fn field_type() -> ::confbind::FieldType {
                ::confbind::FieldType::scalar(::confbind::FieldKind::Struct(#name))
            }

            fn assign(
                &mut self,
                value: ::confbind::Value,
            ) -> ::core::result::Result<(), ::confbind::Value> {
                ::core::result::Result::Err(value)
            }

            fn is_zero(&self) -> bool {
                (0..#count).all(|index| {
                    <Self as ::confbind::Configuration>::field(self, index)
                        .map_or(true, |field| field.is_zero())
                })
            }

            fn as_configuration(
                &mut self,
            ) -> ::core::option::Option<&mut dyn ::confbind::Configuration> {
                ::core::option::Option::Some(self)
            }
        }
    })
}

fn parse_field_attrs(field: &syn::Field) -> syn::Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();

    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("config")) {
        attr.parse_nested_meta(|meta| {
            let tag = meta
                .path
                .get_ident()
                .ok_or_else(|| meta.error("expected a tag name"))?
                .unraw()
                .to_string();

            let value = if meta.input.peek(syn::Token![=]) {
                Some(literal_text(&meta.value()?.parse::<Lit>()?)?)
            } else {
                None
            };

            match (tag.as_str(), value) {
                ("required", value) => attrs.required = is_true(value.as_deref()),
                ("ignore", value) => attrs.ignored = is_true(value.as_deref()),
                ("default", Some(literal)) => attrs.default = Some(literal),
                (_, None) => return Err(meta.error(format!("expected `{tag} = \"...\"`"))),
                (_, Some(_)) if attrs.tags.iter().any(|(existing, _)| *existing == tag) => {
                    return Err(meta.error(format!("duplicate `{tag}` annotation")))
                }
                (_, Some(value)) => attrs.tags.push((tag.clone(), value)),
            }
            Ok(())
        })?;
    }

    Ok(attrs)
}

/// Bare flags (`required`) count as set; explicit values follow `true`/`false`.
fn is_true(value: Option<&str>) -> bool {
    value.map_or(true, |value| value.eq_ignore_ascii_case("true"))
}

fn literal_text(lit: &Lit) -> syn::Result<String> {
    match lit {
        Lit::Str(s) => Ok(s.value()),
        Lit::Bool(b) => Ok(b.value.to_string()),
        Lit::Int(i) => Ok(i.base10_digits().to_owned()),
        Lit::Float(f) => Ok(f.base10_digits().to_owned()),
        other => Err(syn::Error::new(
            other.span(),
            "annotation values must be string, boolean or numeric literals",
        )),
    }
}
