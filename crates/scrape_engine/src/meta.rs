use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

/// One `<meta>` element's attribute set, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTag {
    pub attrs: Vec<(String, String)>,
}

/// Collects `<meta>` start tags straight off the token stream. The DOM
/// keeps attributes in a sorted map, so source order is only visible at
/// this layer.
#[derive(Default)]
struct MetaTagSink {
    tags: RefCell<Vec<MetaTag>>,
}

impl TokenSink for MetaTagSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        if let Token::TagToken(tag) = token {
            if matches!(tag.kind, TagKind::StartTag) && &*tag.name == "meta" {
                self.tags.borrow_mut().push(MetaTag {
                    attrs: tag
                        .attrs
                        .iter()
                        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                        .collect(),
                });
            }
        }
        TokenSinkResult::Continue
    }
}

/// Collect every `<meta>` element's attributes in document order, each
/// attribute set in the order it was written.
///
/// This is a standalone display utility, independent of the table
/// pipeline; the result is never normalized or exported.
pub fn extract_meta_tags(html: &str) -> Vec<MetaTag> {
    let input = BufferQueue::default();
    input.push_back(StrTendril::from(html));
    let tokenizer = Tokenizer::new(MetaTagSink::default(), TokenizerOpts::default());
    let _ = tokenizer.feed(&input);
    tokenizer.end();
    tokenizer.sink.tags.take()
}
