//! Integration tests for the segmenter.
//!
//! Block outlines are pinned with inline `insta` snapshots; every test also
//! runs the structural invariant checks.

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::parsing::{
    SegmentedDocument,
    blocks::{AllInnerBlocks, BlockKind, ContentBlock},
    rope::span::Span,
    snapshot::{invariants, outline},
    split_content_into_blocks,
};

fn segment(md: &str, strict: bool) -> Vec<ContentBlock> {
    let blocks = split_content_into_blocks("doc.md", md, strict);
    invariants(md, &blocks);
    blocks
}

fn kinds(blocks: &[ContentBlock]) -> Vec<BlockKind> {
    blocks.iter().map(|b| b.kind).collect()
}

#[test]
fn front_matter_header_and_paragraph() {
    let md = "---\nms.topic: overview\n---\n# Title\nSome text.";
    let blocks = segment(md, false);
    insta::assert_snapshot!(outline(md, &blocks).join("\n"), @r##"
    Metadata 0..26 "---\nms.topic: overview\n---"
      MetadataField 4..22 "ms.topic: overview" tag="ms_topic"
    Header 27..34 "# Title" level=1
    Paragraph 35..45 "Some text."
    "##);
    assert_eq!(blocks[1].content_text(), "Title");
    assert_eq!(blocks[1].section, Some(Span::new(27, 45)));
}

#[test]
fn pipe_table_rows_and_values() {
    let md = "|a|b|\n|-|-|\n|1|2|\n|3|4|";
    let blocks = segment(md, true);
    insta::assert_snapshot!(outline(md, &blocks).join("\n"), @r#"
    Table 0..23 "|a|b|\n|-|-|\n|1|2|\n|3|4|"
      TableColumn 1..2 "a"
      TableColumn 3..4 "b"
      TableRow 12..17 "|1|2|"
        TableRowValue 13..14 "1"
        TableRowValue 15..16 "2"
      TableRow 18..23 "|3|4|"
        TableRowValue 19..20 "3"
        TableRowValue 21..22 "4"
    "#);
}

#[test]
fn nested_lists_rows_and_links() {
    let md = "- a\n  - b\n- c [x](y.md)\n  more";
    let blocks = segment(md, false);
    insta::assert_snapshot!(outline(md, &blocks).join("\n"), @r#"
    BulletedList 0..30 "- a\n  - b\n- c [x](y.md)\n  more"
      ListItem 0..9 "- a\n  - b"
        BulletedList 6..9 "- b" level=1
          ListItem 6..9 "- b" level=1
      ListItem 10..30 "- c [x](y.md)\n  more"
        Link 14..23 "[x](y.md)" tag="y.md"
        ListRow 26..30 "more"
    "#);
}

#[test]
fn unterminated_fence_runs_to_end() {
    let md = "Intro\n```bash\necho hi";
    let blocks = segment(md, false);
    insta::assert_snapshot!(outline(md, &blocks).join("\n"), @r#"
    Paragraph 0..5 "Intro"
    CodeFence 6..21 "```bash\necho hi" tag="bash"
    "#);
    assert_eq!(blocks[1].content_text(), "echo hi");
}

#[test]
fn fence_is_a_raw_zone() {
    let md = "```\n# not a heading\n- not a list\n[no](link)\n```\nafter";
    let blocks = segment(md, false);
    assert_eq!(kinds(&blocks), vec![BlockKind::CodeFence, BlockKind::Paragraph]);
    assert!(blocks[0].children.is_empty());
    assert_eq!(blocks[0].tag, None);
}

#[test]
fn arm_resource_types_in_json_fences() {
    let md = "```json\n{\n  \"type\": \"Microsoft.Storage/storageAccounts\"\n}\n```";
    let blocks = segment(md, false);
    let fence = &blocks[0];
    assert_eq!(fence.children.len(), 1);

    let resource = &fence.children[0];
    assert_eq!(resource.kind, BlockKind::CodeFenceArmResourceType);
    assert_eq!(resource.text, "Microsoft.Storage/storageAccounts");
    assert_eq!(resource.children[0].kind, BlockKind::CodeFenceArmNamespace);
    assert_eq!(resource.children[0].text, "Microsoft.Storage");
}

#[test]
fn zone_pivot_tab_and_note() {
    let md = ":::zone pivot=\"cli\"\n# [Linux](#tab/linux)\n::: zone-end\n> [!NOTE]\n> See [a](b).";
    let blocks = segment(md, false);
    assert_eq!(kinds(&blocks), vec![BlockKind::ZonePivot, BlockKind::Note]);

    let zone = &blocks[0];
    assert_eq!(zone.span, Span::new(0, 54));
    assert_eq!(zone.tag.as_deref(), Some("pivot=\"cli\""));
    let tab = &zone.children[0];
    assert_eq!(tab.kind, BlockKind::ConceptualTab);
    assert_eq!(tab.tag.as_deref(), Some("linux"));
    assert_eq!(tab.children[0].kind, BlockKind::Link);

    let note = &blocks[1];
    assert_eq!(note.tag.as_deref(), Some("NOTE"));
    assert_eq!(note.span, Span::new(55, 78));
    let link = &note.children[0];
    assert_eq!(link.span, Span::new(71, 77));
    assert_eq!(link.target_text(), Some("b"));
}

#[test]
fn plain_blockquote_is_a_paragraph() {
    let blocks = segment("> just quoted\n> text", false);
    assert_eq!(kinds(&blocks), vec![BlockKind::Paragraph]);
}

#[test]
fn sections_end_at_next_shallower_heading() {
    let md = "# A\n## B\ntext\n## C\n# D";
    let blocks = segment(md, false);
    let sections: Vec<_> = blocks
        .iter()
        .filter_map(|b| b.section)
        .map(|s| &md[s.start..s.end])
        .collect();
    assert_eq!(
        sections,
        vec!["# A\n## B\ntext\n## C\n", "## B\ntext\n", "## C\n", "# D"]
    );
}

#[rstest]
#[case("#Title", false, BlockKind::Header)]
#[case("#Title", true, BlockKind::Paragraph)]
#[case("|a|b|\n|1|2|", false, BlockKind::Table)]
#[case("|a|b|\n|1|2|", true, BlockKind::Paragraph)]
fn strict_mode_tightens_recognition(
    #[case] md: &str,
    #[case] strict: bool,
    #[case] expected: BlockKind,
) {
    assert_eq!(kinds(&segment(md, strict)), vec![expected]);
}

#[test]
fn unterminated_front_matter_is_not_metadata() {
    let blocks = segment("---\ntitle: A\n# Body", false);
    assert!(blocks.iter().all(|b| b.kind != BlockKind::Metadata));
}

#[test]
fn front_matter_continuation_lines_extend_fields() {
    let md = "---\ntags:\n  - a\n  - b\ntitle: T\n---\n";
    let blocks = segment(md, false);
    let fields = &blocks[0].children;
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].text, "tags:\n  - a\n  - b");
    assert_eq!(fields[1].tag.as_deref(), Some("title"));
    assert_eq!(fields[1].content_text(), "T");
}

#[test]
fn code_spans_suppress_links() {
    let blocks = segment("`[x](y)` and [z](w)", false);
    let links: Vec<_> = blocks[0].children.iter().map(|b| b.tag.as_deref()).collect();
    assert_eq!(links, vec![Some("w")]);
}

#[test]
fn crlf_offsets_exclude_line_terminators() {
    let md = "# Title\r\n\r\nBody\r\n";
    let blocks = segment(md, false);
    assert_eq!(blocks[0].text, "# Title");
    assert_eq!(blocks[1].text, "Body");
}

#[test]
fn all_blocks_is_pre_order_and_deterministic() {
    let md = "# A [l](t)\n\n- x\n  - y\n";
    let doc = SegmentedDocument::new("doc.md", md, false);
    let flat: Vec<_> = doc.all_blocks().iter().map(|b| b.kind).collect();
    assert_eq!(
        flat,
        vec![
            BlockKind::Header,
            BlockKind::Link,
            BlockKind::BulletedList,
            BlockKind::ListItem,
            BlockKind::BulletedList,
            BlockKind::ListItem,
        ]
    );
    assert_eq!(
        split_content_into_blocks("doc.md", md, false),
        split_content_into_blocks("doc.md", md, false)
    );
}

#[rstest]
#[case("")]
#[case("\n\n\n")]
#[case("   \n\t\n")]
fn empty_documents_have_no_blocks(#[case] md: &str) {
    assert!(segment(md, false).is_empty());
}

#[test]
fn arbitrary_input_keeps_invariants() {
    let md = "---\na: 1\n---\n|x\n- [a](b\n  ```\n  code\n> [!TIP]\n>\n::: zone pivot=\"p\"\n## [T](#tab/t)\n| c |\n";
    segment(md, false);
    segment(md, true);
}

fn max_level(blocks: &[ContentBlock]) -> u8 {
    AllInnerBlocks::over(blocks).map(|b| b.level).max().unwrap_or(0)
}

#[test]
fn very_deep_lists_clamp_their_level() {
    let md: String = (0..300).map(|d| format!("{}- x\n", " ".repeat(d))).collect();
    let blocks = segment(&md, false);
    let items = AllInnerBlocks::over(&blocks)
        .filter(|b| b.kind == BlockKind::ListItem)
        .count();
    assert_eq!(items, 300);
    assert_eq!(max_level(&blocks), u8::MAX);
}

#[test]
fn byte_order_mark_before_heading() {
    let md = "\u{feff}# Title\nText.";
    let blocks = segment(md, true);
    assert_eq!(kinds(&blocks), vec![BlockKind::Header, BlockKind::Paragraph]);
    assert_eq!(blocks[0].span, Span::new(3, 10));
    assert_eq!(blocks[0].content_text(), "Title");
}
