//! End-to-end patching tests: parse, apply paths, serialize.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use htmlpatch::patch::split_path;
use htmlpatch::{HtmlDocument, PatchError};

fn apply(input: &str, sets: &[(&str, &str)]) -> String {
    let mut doc = HtmlDocument::parse(input).unwrap();
    for (path, value) in sets {
        doc.set_value(&split_path(path, '/'), value).unwrap();
    }
    doc.to_string()
}

// ---------------------------------------------------------------------------
// Basic scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_replace_existing_element_value() {
    let out = apply("<html><b>2</b></html>", &[("html/b", "5")]);
    assert!(out.contains("<b>5</b>"));
}

#[test]
fn test_create_missing_chain() {
    let out = apply(
        "<html></html>",
        &[("html/c/a", "1"), ("html/c/b", "2")],
    );
    assert!(out.contains("<c><a>1</a><b>2</b></c>"));
}

#[test]
fn test_filter_selects_by_attribute_value() {
    let out = apply(
        "<html><e><item key=\"item1\">1</item><item key=\"item2\">2</item></e></html>",
        &[("html/e/item[@key='item2']", "5")],
    );
    assert_eq!(
        out,
        "<html><e><item key=\"item1\">1</item><item key=\"item2\">5</item></e></html>"
    );
}

#[test]
fn test_delete_element_with_contents() {
    let mut doc = HtmlDocument::parse("<html><a><x>1</x></a></html>").unwrap();
    doc.delete_key(&["html", "a"]).unwrap();
    assert_eq!(doc.to_string(), "<html></html>");
}

#[test]
fn test_delete_attribute_only() {
    let mut doc = HtmlDocument::parse("<html><c key=\"item1\" foo=\"bar\">3</c></html>").unwrap();
    doc.delete_key(&["html", "c", "@key"]).unwrap();
    assert!(doc.to_string().contains("<c foo=\"bar\">3</c>"));
}

#[test]
fn test_blank_item_is_invalid_path() {
    let mut doc = HtmlDocument::parse("<html/>").unwrap();
    let err = doc.set_value(&["a", "", "b"], "x").unwrap_err();
    assert!(matches!(err, PatchError::InvalidPath { .. }));
    assert_eq!(
        err.to_string(),
        "invalid path `a//b`: there are empty items in the path"
    );

    let err = doc.delete_key(&["a", "   ", "b"]).unwrap_err();
    assert!(err.to_string().ends_with("there are empty items in the path"));
    assert_eq!(doc.to_string(), "<html/>");
}

// ---------------------------------------------------------------------------
// Whole-document transforms
// ---------------------------------------------------------------------------

#[test]
fn test_transform_keeps_untouched_layout() {
    let input = "<html>
<a>
 <x>1</x>
</a>
<b>2</b>
<c>3</c>
<e>
  <item key=\"item1\">1</item>
  <item key=\"item2\">2</item>
  <item key=\"item3\">3</item>
</e>
<f>
  <item key=\"item1\">
    <val>1</val>
  </item>
  <item key=\"item2\">
    <val>2</val>
  </item>
  <item key=\"item3\">
    <val>3</val>
  </item>
</f>
</html>";

    let out = apply(
        input,
        &[
            ("html/a/y", "2"),
            ("html/a/@y", "3"),
            ("html/a/z/t/w", "3"),
            ("html/b", "5"),
            ("html/c/a", "1"),
            ("html/c/b", "2"),
            ("html/c/b/t", "3"),
            ("html/e/item[@key = 'item2']", "5"),
            ("html/e/item[@key=\"item3\"]", "6"),
            ("html/f/item[@key = 'item2']/val", "7"),
            ("html/f/item[@key=\"item3\"]/val", "8"),
            ("html/d", "4"),
        ],
    );

    assert_eq!(
        out,
        "<html>
<a y=\"3\">
 <x>1</x>
<y>2</y><z><t><w>3</w></t></z></a>
<b>5</b>
<c><a>1</a><b><t>3</t></b></c>
<e>
  <item key=\"item1\">1</item>
  <item key=\"item2\">5</item>
  <item key=\"item3\">6</item>
</e>
<f>
  <item key=\"item1\">
    <val>1</val>
  </item>
  <item key=\"item2\">
    <val>7</val>
  </item>
  <item key=\"item3\">
    <val>8</val>
  </item>
</f>
<d>4</d></html>"
    );
}

#[test]
fn test_transform_matches_names_case_insensitively() {
    let input = "<html xmlns=\"http://www.w3.org/1999/xhtml\">
  <head></head>
  <BODY>
    <p></p>
    <DIV id=\"d1\"></DIV>
    <div id=\"d2\"><P></P></div>
  </BODY>
</html>";

    let out = apply(
        input,
        &[
            ("html/body/p", "Text"),
            ("html/body/div[@id='d1']", "Div"),
            ("html/body/div[@id='d2']/p", "Text2"),
        ],
    );

    assert_eq!(
        out,
        "<html xmlns=\"http://www.w3.org/1999/xhtml\">
  <head></head>
  <BODY>
    <p>Text</p>
    <DIV id=\"d1\">Div</DIV>
    <div id=\"d2\"><P>Text2</P></div>
  </BODY>
</html>"
    );
}

#[test]
fn test_remove_leaves_surrounding_whitespace() {
    let mut doc = HtmlDocument::parse(
        "<html>\n    <a>\n      <x>1</x>\n    </a>\n    <b>\n      <x>1</x>\n    </b>\n    <c key=\"item1\" foo=\"bar\">3</c>\n</html>",
    )
    .unwrap();

    doc.delete_key(&["html", "a"]).unwrap();
    doc.delete_key(&["html", "b", "x"]).unwrap();
    doc.delete_key(&["html", "c", "@key"]).unwrap();

    assert_eq!(
        doc.to_string(),
        "<html>\n    \n    <b>\n      \n    </b>\n    <c foo=\"bar\">3</c>\n</html>"
    );
}

// ---------------------------------------------------------------------------
// Attribute escaping
// ---------------------------------------------------------------------------

const CONNECTION: &str = r"metadata=res://*/Model.csdl|res://*/Model.ssdl|res://*/Model.msl;provider=System.Data.SqlClient;provider connection string=&quot;data source=other-server\instance;initial catalog=database;integrated security=True;multipleactiveresultsets=True;&quot;";

#[test]
fn test_pre_escaped_attribute_is_escaped_once() {
    let mut doc = HtmlDocument::parse(
        "<html>\n  <connectionStrings>\n    <add name=\"Connection\" connectionString=\"\" />\n  </connectionStrings>\n</html>",
    )
    .unwrap();

    doc.set_value(
        &[
            "html",
            "connectionStrings",
            "add[@name=\"Connection\"]",
            "@connectionString",
        ],
        CONNECTION,
    )
    .unwrap();

    assert_eq!(
        doc.to_string(),
        format!(
            "<html>\n  <connectionStrings>\n    <add name=\"Connection\" connectionString=\"{CONNECTION}\" />\n  </connectionStrings>\n</html>"
        )
    );
}

#[test]
fn test_literal_quotes_are_escaped() {
    let mut doc = HtmlDocument::parse(
        "<html>\n  <connectionStrings>\n    <add name=\"api:Connection\" connectionString=\"\" />\n  </connectionStrings>\n</html>",
    )
    .unwrap();

    let literal = CONNECTION.replace("&quot;", "\"");
    doc.set_value(
        &[
            "html",
            "connectionStrings",
            "add[@name='api:Connection']",
            "@connectionString",
        ],
        &literal,
    )
    .unwrap();

    assert_eq!(
        doc.to_string(),
        format!(
            "<html>\n  <connectionStrings>\n    <add name=\"api:Connection\" connectionString=\"{CONNECTION}\" />\n  </connectionStrings>\n</html>"
        )
    );
}

// ---------------------------------------------------------------------------
// Matching rules
// ---------------------------------------------------------------------------

#[test]
fn test_filter_value_is_case_sensitive_name_is_not() {
    let mut doc = HtmlDocument::parse("<html><e><item key=\"item2\">2</item></e></html>").unwrap();

    let err = doc
        .delete_key(&["html", "e", "item[@key=\"Item2\"]"])
        .unwrap_err();
    assert!(matches!(err, PatchError::NotFound { .. }));

    doc.set_value(&["html", "e", "ITEM[@key='item2']"], "9").unwrap();
    assert_eq!(doc.to_string(), "<html><e><item key=\"item2\">9</item></e></html>");
}

#[test]
fn test_root_mismatch() {
    let mut doc = HtmlDocument::parse("<html><b>2</b></html>").unwrap();
    let err = doc.set_value(&["body", "b"], "1").unwrap_err();
    assert_eq!(
        err.to_string(),
        "root element name `html` does not match path root `body`"
    );
    assert_eq!(doc.to_string(), "<html><b>2</b></html>");
}

#[test]
fn test_attribute_item_must_be_last() {
    let mut doc = HtmlDocument::parse("<html></html>").unwrap();
    let err = doc.set_value(&["html", "@id", "b"], "1").unwrap_err();
    assert!(matches!(err, PatchError::InvalidPath { .. }));
    assert_eq!(doc.to_string(), "<html></html>");
}

#[test]
fn test_non_html_root_is_rejected() {
    let err = HtmlDocument::parse("<configuration></configuration>").unwrap_err();
    assert!(matches!(err, PatchError::MalformedDocument { .. }));
}

// ---------------------------------------------------------------------------
// Set-then-get
// ---------------------------------------------------------------------------

#[test]
fn test_set_then_get_identity() {
    let mut doc = HtmlDocument::parse("<html>\n  <appSettings/>\n</html>").unwrap();
    let cases: &[(&str, &str)] = &[
        ("html/appSettings/add[@key='Mode']/@value", "Release"),
        ("html/appSettings/add[@key='Url']/@value", "http://a/b?x=1&y=2"),
        ("html/system.web/compilation/@debug", "false"),
        ("html/title", "Build 42"),
        ("html/body/div[@id='main']", "<p>hello</p>"),
    ];

    for (path, value) in cases {
        let items = split_path(path, '/');
        doc.set_value(&items, value).unwrap();
        assert_eq!(doc.value(&items).unwrap().as_deref(), Some(*value), "{path}");
    }

    // Re-applying the same writes creates no duplicates.
    let before = doc.to_string();
    for (path, value) in cases {
        doc.set_value(&split_path(path, '/'), value).unwrap();
    }
    assert_eq!(doc.to_string(), before);
}

#[test]
fn test_sibling_after_implicitly_closed_element_survives_reparse() {
    let mut doc = HtmlDocument::parse("<html><body><p>text</body></html>").unwrap();
    doc.set_value(&["html", "body", "d"], "4").unwrap();
    let out = doc.to_string();
    assert_eq!(out, "<html><body><p>text</p><d>4</d></body></html>");

    let reparsed = HtmlDocument::parse(&out).unwrap();
    assert_eq!(
        reparsed.value(&["html", "body", "d"]).unwrap().as_deref(),
        Some("4")
    );
    assert_eq!(
        reparsed.value(&["html", "body", "p"]).unwrap().as_deref(),
        Some("text")
    );
}

#[test]
fn test_unwritable_names_are_rejected_untouched() {
    let mut doc = HtmlDocument::parse("<html></html>").unwrap();
    for path in [
        &["html", "@"][..],
        &["html", "x></x><script>alert(1)</script><y"][..],
    ] {
        let err = doc.set_value(path, "v").unwrap_err();
        assert!(matches!(err, PatchError::InvalidPath { .. }), "{path:?}");
    }
    assert_eq!(doc.to_string(), "<html></html>");
}

#[test]
fn test_untouched_document_round_trips() {
    let input = "<!DOCTYPE html>\r\n<HTML Lang=en>\r\n  <Head><Meta Charset='utf-8'><TITLE>x &amp; y</title></head>\r\n  <body>\r\n    <ul><li>one<li>two</ul>\r\n    <input disabled>\r\n  </body>\r\n</HTML>\r\n";
    let doc = HtmlDocument::parse(input).unwrap();
    assert_eq!(doc.to_string(), input);
}
