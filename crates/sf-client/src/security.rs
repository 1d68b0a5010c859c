//! Injection guards for values that end up in SOQL or URLs.
//!
//! Every identifier and literal the connector interpolates into a query
//! goes through [`soql`]; every record id or key value placed in a path
//! goes through [`url`].
//!
//! ```rust
//! use busbar_sf_client::security::soql;
//!
//! let name = soql::escape_string("O'Brien");
//! let query = format!("SELECT Id FROM Account WHERE Name = '{}'", name);
//! assert_eq!(query, "SELECT Id FROM Account WHERE Name = 'O\\'Brien'");
//! ```

/// SOQL identifier validation and literal escaping.
pub mod soql {
    /// Escape a string value for use inside a single-quoted SOQL literal.
    ///
    /// Escapes backslash, NUL, LF, CR, Ctrl-Z (0x1A), and both quote
    /// characters.
    ///
    /// # Example
    ///
    /// ```rust
    /// use busbar_sf_client::security::soql;
    ///
    /// assert_eq!(soql::escape_string("O'Brien & Co."), "O\\'Brien & Co.");
    /// assert_eq!(soql::escape_string("say \"hi\""), "say \\\"hi\\\"");
    /// ```
    ///
    /// # SOQL Injection Context
    ///
    /// ```text
    /// Input:  "' OR Name LIKE '%"
    /// Unsafe: SELECT Id FROM Account WHERE Name = '' OR Name LIKE '%'
    /// Safe:   SELECT Id FROM Account WHERE Name = '\' OR Name LIKE \'%'
    /// ```
    #[must_use]
    pub fn escape_string(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len() + 16);
        for ch in value.chars() {
            match ch {
                '\\' => escaped.push_str("\\\\"),
                '\0' => escaped.push_str("\\0"),
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                '\u{1a}' => escaped.push_str("\\Z"),
                '\'' => escaped.push_str("\\'"),
                '"' => escaped.push_str("\\\""),
                _ => escaped.push(ch),
            }
        }
        escaped
    }

    /// Check an identifier against the `[A-Za-z_.]+` allow-list.
    ///
    /// Dots separate a relationship path (`Owner.Name`).
    ///
    /// ```rust
    /// use busbar_sf_client::security::soql;
    ///
    /// assert!(soql::is_safe_identifier("Owner.Name"));
    /// assert!(soql::is_safe_identifier("Custom_Field__c"));
    /// assert!(!soql::is_safe_identifier("Bad'; DROP TABLE--"));
    /// ```
    #[must_use]
    pub fn is_safe_identifier(name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|ch| ch.is_ascii_alphabetic() || ch == '_' || ch == '.')
    }

    /// Normalise a field reference and validate it.
    ///
    /// The pipeline separates record type and property with `:`; SOQL uses
    /// `.`. Returns `None` when the normalised name is not a safe identifier.
    ///
    /// ```rust
    /// use busbar_sf_client::security::soql;
    ///
    /// assert_eq!(soql::sanitize_field("Owner:Name").as_deref(), Some("Owner.Name"));
    /// assert_eq!(soql::sanitize_field("Name)"), None);
    /// ```
    #[must_use]
    pub fn sanitize_field(name: &str) -> Option<String> {
        let normalised = name.replace(':', ".");
        is_safe_identifier(&normalised).then_some(normalised)
    }

    /// Validate an sObject name used as a REST path segment
    /// (`/sobjects/<name>`).
    ///
    /// Same allow-list as fields, minus the relationship dot. SOQL `FROM`
    /// clauses take any [`is_safe_identifier`] name.
    #[must_use]
    pub fn is_safe_sobject_name(name: &str) -> bool {
        is_safe_identifier(name) && !name.contains('.')
    }
}

/// URL path-segment encoding.
pub mod url {
    /// Percent-encode a value for use as one URL path segment.
    ///
    /// ```rust
    /// use busbar_sf_client::security::url;
    ///
    /// assert_eq!(url::encode_param("001/test"), "001%2Ftest");
    /// ```
    #[must_use]
    pub fn encode_param(value: &str) -> String {
        urlencoding::encode(value).into_owned()
    }
}
