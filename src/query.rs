//! Batched Query Builder
//!
//! Builds the GraphQL document sent to GitHub for a single language: twelve
//! aliased `search` sub-queries, one per month of the window, each asking for
//! a repository count.
//!
//! The document is a structured, ordered list of sub-queries; rendering to
//! the wire string happens only at the transport boundary. Alias order must
//! match the order of the months handed in, since the collector extracts
//! counts by walking the aliases.

/// The twelve sub-query aliases, in emission order. `one` is the first month
/// handed to [`QueryDocument::build`] (the most recent month of the window).
pub const ALIASES: [&str; 12] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve",
];

/// A single aliased sub-query: count repositories created in `month`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubQuery {
    /// Fixed alias from [`ALIASES`].
    pub alias: &'static str,
    /// Creation month filter in `YYYY-MM` format.
    pub month: String,
}

/// A batched query for one language: twelve aliased sub-queries over the
/// month window. No local validation of the language name or month format
/// is done; GitHub rejects bad filters and that surfaces as a fetch error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDocument {
    language: String,
    sub_queries: Vec<SubQuery>,
}

impl QueryDocument {
    /// Build the document for `language` over `query_months`.
    ///
    /// Sub-query `i` is aliased `ALIASES[i]` and filters on
    /// `query_months[i]`; callers pass the window's query months so that
    /// alias order and month order stay aligned.
    pub fn build(language: &str, query_months: &[String]) -> Self {
        debug_assert_eq!(query_months.len(), ALIASES.len());

        let sub_queries = ALIASES
            .iter()
            .zip(query_months)
            .map(|(&alias, month)| SubQuery {
                alias,
                month: month.clone(),
            })
            .collect();

        Self {
            language: language.to_string(),
            sub_queries,
        }
    }

    /// Language this document queries for.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The aliased sub-queries, in emission order.
    pub fn sub_queries(&self) -> &[SubQuery] {
        &self.sub_queries
    }

    /// Render the document to GraphQL wire format.
    pub fn to_graphql(&self) -> String {
        let mut document = String::from("{\n");
        for sub in &self.sub_queries {
            document.push_str(&format!(
                "  {}: search(query: \"language:{}, created:{}\", type: REPOSITORY) {{ repositoryCount }}\n",
                sub.alias, self.language, sub.month
            ));
        }
        document.push('}');
        document
    }
}
