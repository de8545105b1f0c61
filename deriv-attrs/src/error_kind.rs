use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{
    parse::{Parse, ParseStream},
    Attribute,
    Expr,
    Generics,
    Ident,
    ItemStruct,
    Result,
    Token,
};

/// The tags accepted by the `error` attribute.
#[derive(Debug, Default)]
pub struct ErrorArgs {
    pub message: Option<Expr>,
    pub labels: Option<Expr>,
    pub help: Option<Expr>,
}

impl ErrorArgs {
    /// Parses a single `tag = expr` pair and stores it.
    fn parse_arg(&mut self, input: ParseStream) -> Result<()> {
        let ident: Ident = input.parse()?;
        input.parse::<Token![=]>()?;

        let slot = match ident.to_string().as_str() {
            "message" => &mut self.message,
            "labels" => &mut self.labels,
            "help" => &mut self.help,
            other => return Err(syn::Error::new_spanned(&ident, format!("unknown tag `{}`", other))),
        };

        if slot.is_some() {
            return Err(syn::Error::new_spanned(&ident, format!("duplicate tag `{}`", ident)));
        }
        *slot = Some(input.parse()?);
        Ok(())
    }
}

impl Parse for ErrorArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut args = ErrorArgs::default();

        while !input.is_empty() {
            args.parse_arg(input)?;
            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        Ok(args)
    }
}

/// A struct that `ErrorKind` is being derived for.
#[derive(Debug)]
pub struct ErrorKindTarget {
    pub name: Ident,
    pub generics: Generics,
    pub error_args: ErrorArgs,
}

impl Parse for ErrorKindTarget {
    fn parse(input: ParseStream) -> Result<Self> {
        // doc comments and derives come through as outer attributes as well
        let attributes = input.call(Attribute::parse_outer)?;
        let item = input.parse::<ItemStruct>()?;

        let mut error_args = None;
        for attr in &attributes {
            if attr.path().is_ident("error") {
                error_args = Some(attr.parse_args::<ErrorArgs>()?);
                break;
            }
        }

        let error_args = error_args.ok_or_else(|| {
            syn::Error::new_spanned(&item.ident, "missing `#[error(...)]` attribute")
        })?;
        if error_args.message.is_none() {
            return Err(syn::Error::new_spanned(&item.ident, "the `message` tag is required"));
        }

        Ok(ErrorKindTarget {
            name: item.ident,
            generics: item.generics,
            error_args,
        })
    }
}

impl ToTokens for ErrorKindTarget {
    fn to_tokens(&self, tokens: &mut TokenStream2) {
        let message = self.error_args.message.as_ref();
        let labels = self.error_args.labels.as_ref()
            .map(|labels| quote! { #labels })
            .unwrap_or_else(|| quote! { ::std::vec::Vec::<::std::string::String>::new() });
        let help = self.error_args.help.as_ref()
            .map(|help| quote! { builder.set_help(#help); });

        tokens.extend(quote! {
            fn message(&self) -> ::std::string::String {
                ::std::string::ToString::to_string(&#message)
            }

            fn build_report<'a>(
                &self,
                src_id: &'a str,
                spans: &[::std::ops::Range<usize>],
            ) -> ::ariadne::Report<(&'a str, ::std::ops::Range<usize>)> {
                let offset = spans.first().map_or(0, |span| span.start);
                #[allow(unused_mut)]
                let mut builder = ::ariadne::Report::build(::ariadne::ReportKind::Error, src_id, offset)
                    .with_message(::deriv_error::ErrorKind::message(self))
                    .with_labels(
                        ::std::iter::IntoIterator::into_iter(#labels)
                            .zip(spans.iter())
                            .map(|(label_str, span)| {
                                let label_str = ::std::string::ToString::to_string(&label_str);
                                let label = ::ariadne::Label::new((src_id, span.clone()))
                                    .with_color(::deriv_error::EXPR);

                                if label_str.is_empty() {
                                    label
                                } else {
                                    label.with_message(label_str)
                                }
                            })
                            .collect::<::std::vec::Vec<_>>()
                    );

                #help
                builder.finish()
            }
        });
    }
}
