use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::Parse;
use syn::{Data, DeriveInput, Fields, Ident, LitInt, LitStr, Token, Type, parse_macro_input};

/// Column metadata collected from a field's `#[excel(...)]` attributes.
#[derive(Default)]
struct ColumnAttr {
    index: Option<LitInt>,
    title: Option<LitStr>,
    order: Option<LitInt>,
    groups: Vec<LitStr>,
}

enum FieldRole {
    Plain,
    Column(ColumnAttr),
    Parent,
    Skip,
}

/// Field markers that exclude column metadata on the same field.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Marker {
    Skip,
    Parent,
}

impl Marker {
    fn keyword(self) -> &'static str {
        match self {
            Marker::Skip => "skip",
            Marker::Parent => "parent",
        }
    }
}

/* ────────────────────────── the derive macro ───────────────────── */
#[proc_macro_derive(ExcelRecord, attributes(excel))]
pub fn derive_excel_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;

    /* -------- 1 · shape checks -------- */
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "ExcelRecord cannot be derived for generic types",
        ));
    }
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    ident,
                    "ExcelRecord requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                ident,
                "ExcelRecord can only be derived for structs",
            ));
        }
    };

    /* -------- 2 · container attributes -------- */
    let mut record_name = LitStr::new(&ident.unraw().to_string(), ident.span());
    let mut constructible = false;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("excel")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                record_name = meta.value()?.parse()?;
                Ok(())
            } else if meta.path.is_ident("default") {
                constructible = true;
                Ok(())
            } else {
                Err(meta.error("expected `name = \"..\"` or `default`"))
            }
        })?;
    }

    /* -------- 3 · field attributes -------- */
    let mut parent: Option<(&Ident, &Type)> = None;
    let mut registrations = Vec::new();
    for field in fields {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        match field_role(field)? {
            FieldRole::Skip => {}
            FieldRole::Parent => {
                if parent.is_some() {
                    return Err(syn::Error::new_spanned(
                        field_ident,
                        "only one field can be marked #[excel(parent)]",
                    ));
                }
                parent = Some((field_ident, &field.ty));
            }
            FieldRole::Plain => {
                let name = field_ident.unraw().to_string();
                registrations.push(quote! {
                    .plain(#name, |record: &#ident| &record.#field_ident)
                });
            }
            FieldRole::Column(column) => {
                let name = field_ident.unraw().to_string();
                let meta = column_meta_tokens(&column);
                registrations.push(quote! {
                    .column(#name, #meta, |record: &#ident| &record.#field_ident)
                });
            }
        }
    }

    /* -------- 4 · assemble expanded code -------- */
    let extends = parent.map(|(field_ident, ty)| {
        quote! {
            .extends(
                <#ty as ::sheetbind::ExcelRecord>::record_type(),
                |record: &#ident| &record.#field_ident,
            )
        }
    });
    let constructor = constructible.then(|| {
        quote! { .constructor(<#ident as ::core::default::Default>::default) }
    });

    Ok(quote! {
        impl ::sheetbind::ExcelRecord for #ident {
            fn record_type() -> ::sheetbind::__private::Arc<::sheetbind::RecordType> {
                static RECORD: ::sheetbind::__private::Lazy<
                    ::sheetbind::__private::Arc<::sheetbind::RecordType>,
                > = ::sheetbind::__private::Lazy::new(|| {
                    let builder = ::sheetbind::RecordType::builder::<#ident>(#record_name)
                        #extends
                        #(#registrations)*
                        #constructor;
                    match builder.build() {
                        ::core::result::Result::Ok(record) => record,
                        ::core::result::Result::Err(err) => ::core::panic!("{}", err),
                    }
                });
                ::sheetbind::__private::Arc::clone(&RECORD)
            }
        }
    })
}

fn field_role(field: &syn::Field) -> syn::Result<FieldRole> {
    let mut column = ColumnAttr::default();
    let mut tagged = false;
    let mut marker: Option<(Marker, syn::Path)> = None;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("excel")) {
        // `#[excel]` with no list still opts the field into column metadata.
        if matches!(attr.meta, syn::Meta::Path(_)) {
            tagged = true;
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let found = if meta.path.is_ident("skip") {
                Marker::Skip
            } else if meta.path.is_ident("parent") {
                Marker::Parent
            } else {
                tagged = true;
                if meta.path.is_ident("index") {
                    column.index = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("title") {
                    column.title = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("order") {
                    column.order = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("groups") {
                    let content;
                    syn::parenthesized!(content in meta.input);
                    let tags = content.parse_terminated(<LitStr as Parse>::parse, Token![,])?;
                    column.groups.extend(tags);
                } else {
                    return Err(meta.error(
                        "expected `index`, `title`, `order`, `groups`, `skip` or `parent`",
                    ));
                }
                return Ok(());
            };
            if let Some((seen, _)) = &marker {
                if *seen != found {
                    return Err(meta.error("`skip` and `parent` cannot be combined"));
                }
            }
            marker = Some((found, meta.path.clone()));
            Ok(())
        })?;
    }

    match marker {
        Some((found, path)) if tagged => Err(syn::Error::new_spanned(
            path,
            format!("`{}` cannot be combined with column metadata", found.keyword()),
        )),
        Some((Marker::Skip, _)) => Ok(FieldRole::Skip),
        Some((Marker::Parent, _)) => Ok(FieldRole::Parent),
        None if tagged => Ok(FieldRole::Column(column)),
        None => Ok(FieldRole::Plain),
    }
}

fn column_meta_tokens(column: &ColumnAttr) -> TokenStream2 {
    let index = column.index.as_ref().map(|i| quote! { .index(#i) });
    let title = column.title.as_ref().map(|t| quote! { .title(#t) });
    let order = column.order.as_ref().map(|o| quote! { .order(#o) });
    let groups = column.groups.iter().map(|g| quote! { .group(#g) });
    quote! {
        ::sheetbind::ColumnMeta::new() #index #title #order #(#groups)*
    }
}
