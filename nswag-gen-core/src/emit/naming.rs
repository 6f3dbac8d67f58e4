use heck::{ToPascalCase, ToSnakeCase};
use proc_macro2::{Ident, Span, TokenStream};
use quote::{ToTokens, TokenStreamExt, quote};

/// A name from the description, cased and cleaned for use as a
/// Rust identifier.
#[derive(Clone, Copy, Debug)]
pub enum CodegenIdent<'a> {
    Module(&'a str),
    Type(&'a str),
    Field(&'a str),
    Variant(&'a str),
    Param(&'a str),
    Method(&'a str),
}

impl<'a> CodegenIdent<'a> {
    fn name(&self) -> &'a str {
        let (Self::Module(s)
        | Self::Type(s)
        | Self::Field(s)
        | Self::Variant(s)
        | Self::Param(s)
        | Self::Method(s)) = self;
        s
    }

    /// Returns the cased and cleaned identifier, without a raw prefix.
    pub fn to_unraw_string(&self) -> String {
        let cased = match self {
            Self::Module(name) | Self::Field(name) | Self::Param(name) | Self::Method(name) => {
                name.to_snake_case()
            }
            Self::Type(name) | Self::Variant(name) => name.to_pascal_case(),
        };
        clean(&cased)
    }
}

impl ToTokens for CodegenIdent<'_> {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let cleaned = self.to_unraw_string();
        let ident: syn::Result<Ident> = syn::parse_str(&cleaned)
            .or_else(|_| syn::parse_str(&format!("r#{cleaned}")))
            .or_else(|_| syn::parse_str(&format!("{cleaned}_")))
            .map_err(|_| {
                syn::Error::new(
                    Span::call_site(),
                    format!(
                        "`{}` can't be represented as a Rust identifier",
                        self.name()
                    ),
                )
            });
        match ident {
            Ok(ident) => tokens.append(ident),
            Err(err) => tokens.append_all(err.into_compile_error()),
        }
    }
}

/// Visibility from an NSwag access modifier.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CodegenVis {
    Public,
    Crate,
    Private,
}

impl CodegenVis {
    pub fn from_modifier(modifier: &str) -> Self {
        match modifier.trim().to_ascii_lowercase().as_str() {
            "public" => Self::Public,
            "internal" => Self::Crate,
            _ => Self::Private,
        }
    }
}

impl ToTokens for CodegenVis {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.append_all(match self {
            Self::Public => quote!(pub),
            Self::Crate => quote!(pub(crate)),
            Self::Private => quote!(),
        });
    }
}

/// Replaces characters that can't appear in an identifier with `_`.
pub fn clean(s: &str) -> String {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut string = String::with_capacity(s.len());
    if first == '_' || unicode_ident::is_xid_start(first) {
        string.push(first);
    } else {
        string.push('_');
        chars = s.chars();
    }
    string.push_str(
        &chars
            .as_str()
            .replace(|next| !unicode_ident::is_xid_continue(next), "_"),
    );
    string
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idents_are_cased() {
        assert_eq!(CodegenIdent::Method("listPets").to_token_stream().to_string(), "list_pets");
        assert_eq!(CodegenIdent::Type("pet-owner").to_token_stream().to_string(), "PetOwner");
    }

    #[test]
    fn test_keywords_become_raw() {
        assert_eq!(CodegenIdent::Field("type").to_token_stream().to_string(), "r#type");
        assert_eq!(CodegenIdent::Method("match").to_token_stream().to_string(), "r#match");
    }

    #[test]
    fn test_clean_leading_digit() {
        assert_eq!(clean("2fa"), "_2fa");
        assert_eq!(clean("x-rate.limit"), "x_rate_limit");
    }

    #[test]
    fn test_access_modifiers() {
        assert_eq!(CodegenVis::from_modifier("Public"), CodegenVis::Public);
        assert_eq!(CodegenVis::from_modifier("internal"), CodegenVis::Crate);
        assert_eq!(CodegenVis::from_modifier("private"), CodegenVis::Private);
    }
}
