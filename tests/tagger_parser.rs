use studyref_core::tagger::{
    parse_phrases, parse_tokens, ChunkState, ParsedLine, TaggerOutputError,
};
use studyref_core::types::{Chunk, PhraseIndex, TaggedToken};

fn tok(word: &str, tag: &str) -> TaggedToken {
    TaggedToken::new(word, tag)
}

#[test]
fn golden_single_noun_phrase() {
    let input = "<NP>\nStudies\tNNS\tstudy\nshow\tVBP\tshow\n</NP>";
    let index = parse_phrases(input).unwrap();

    let mut expected = PhraseIndex::new();
    expected.push(Chunk::new(
        "<NP>",
        vec![tok("Studies", "NNS"), tok("show", "VBP")],
    ));
    assert_eq!(index, expected);

    let chunk = &index.get("<NP>").unwrap()[0];
    assert_eq!(chunk.tokens()[0].surface(), "Studies");
    assert_eq!(chunk.text(), "Studies show");
}

#[test]
fn invariant_chunk_count_equals_close_tags() {
    let input = "\
<NC>
The\tDT\tthe
survey\tNN\tsurvey
</NC>
<VC>
was\tVBD\tbe
conducted\tVBN\tconduct
</VC>
<NC>
ALLBUS\tNP\tALLBUS
</NC>
<PC>
in\tIN\tin
</PC>";
    let index = parse_phrases(input).unwrap();

    let close_tags = input.lines().filter(|l| l.starts_with("</")).count();
    assert_eq!(index.chunk_count(), close_tags);

    let nc = index.get("<NC>").unwrap();
    assert_eq!(nc.len(), 2);
    assert_eq!(nc[0].tokens(), vec![tok("The", "DT"), tok("survey", "NN")]);
    assert_eq!(nc[1].tokens(), vec![tok("ALLBUS", "NP")]);
    assert_eq!(index.get("<VC>").unwrap()[0].text(), "was conducted");
    assert_eq!(index.get("<PC>").unwrap()[0].end_tag(), "</PC>");

    let tags: Vec<&str> = index.tags().collect();
    assert_eq!(tags.len(), 3);
}

#[test]
fn invariant_chunks_keep_document_order_within_tag() {
    let input = "<NC>\nfirst\tJJ\tfirst\n</NC>\n<NC>\nsecond\tJJ\tsecond\n</NC>\n<NC>\nthird\tJJ\tthird\n</NC>";
    let index = parse_phrases(input).unwrap();
    let texts: Vec<String> = index.get("<NC>").unwrap().iter().map(Chunk::text).collect();
    assert_eq!(texts, ["first", "second", "third"]);
}

#[test]
fn edge_unmatched_close_tag_yields_empty_chunk() {
    let index = parse_phrases("</NC>").unwrap();
    assert_eq!(index.chunk_count(), 1);
    let chunk = &index.get("").unwrap()[0];
    assert!(chunk.tokens().is_empty());
    assert_eq!(chunk.start_tag(), "");
    assert_eq!(chunk.end_tag(), "");
}

#[test]
fn edge_tokens_outside_phrases_are_dropped() {
    let input = "stray\tNN\tstray\n<NC>\ndata\tNNS\tdatum\n</NC>\nafter\tIN\tafter";
    let index = parse_phrases(input).unwrap();
    assert_eq!(index.chunk_count(), 1);
    assert_eq!(index.get("<NC>").unwrap()[0].tokens(), vec![tok("data", "NNS")]);
}

#[test]
fn edge_reopened_phrase_discards_unclosed_tokens() {
    let input = "<NC>\nlost\tNN\tlost\n<VC>\nkept\tVBN\tkeep\n</VC>";
    let index = parse_phrases(input).unwrap();
    assert!(index.get("<NC>").is_none());
    assert_eq!(index.get("<VC>").unwrap()[0].tokens(), vec![tok("kept", "VBN")]);
}

#[test]
fn edge_unclosed_phrase_at_end_is_dropped() {
    let index = parse_phrases("<NC>\ndangling\tNN\tdangling").unwrap();
    assert!(index.is_empty());
}

#[test]
fn invariant_crlf_and_blank_lines_are_tolerated() {
    let input = "<NC>\r\nsample\tNN\tsample\r\n\r\n</NC>\r\n";
    let index = parse_phrases(input).unwrap();
    assert_eq!(index.get("<NC>").unwrap()[0].tokens(), vec![tok("sample", "NN")]);
}

#[test]
fn invariant_malformed_line_aborts_phrase_parse() {
    let input = "<NC>\nok\tNN\tok\nbroken line\n</NC>";
    let err = parse_phrases(input).unwrap_err();
    assert_eq!(
        err,
        TaggerOutputError::MalformedLine {
            line_number: 3,
            line: "broken line".into(),
            fields: 1,
        }
    );
}

#[test]
fn invariant_malformed_line_aborts_token_parse() {
    let err = parse_tokens("a\tDT\ta\ntoo\tmany\tfields\there").unwrap_err();
    assert!(matches!(
        err,
        TaggerOutputError::MalformedLine { line_number: 2, fields: 4, .. }
    ));
}

#[test]
fn invariant_parse_tokens_keeps_every_token_in_order() {
    let input = "The\tDT\tthe\nALLBUS\tNP\tALLBUS\n2010\tCD\t@card@\n.\tSENT\t.";
    let tokens = parse_tokens(input).unwrap();
    assert_eq!(tokens.len(), input.lines().count());
    assert_eq!(
        tokens,
        vec![
            tok("The", "DT"),
            tok("ALLBUS", "NP"),
            tok("2010", "CD"),
            tok(".", "SENT"),
        ]
    );
}

#[test]
fn invariant_parse_tokens_skips_tag_lines_only() {
    let input = "<NC>\nout\tRP\tout\n</NC>\nloose\tJJ\tloose";
    let tokens = parse_tokens(input).unwrap();
    assert_eq!(tokens, vec![tok("out", "RP"), tok("loose", "JJ")]);
}

#[test]
fn invariant_lemma_may_be_empty() {
    let tokens = parse_tokens("word\tNN\t").unwrap();
    assert_eq!(tokens, vec![tok("word", "NN")]);
}

#[test]
fn transition_outside_close_pushes_empty_chunk() {
    let mut index = PhraseIndex::new();
    let state = ChunkState::Outside.step(ParsedLine::Close("</NC>".into()), &mut index);
    assert_eq!(state, ChunkState::Outside);
    assert_eq!(index.chunk_count(), 1);
}

#[test]
fn transition_open_then_token_accumulates() {
    let mut index = PhraseIndex::new();
    let state = ChunkState::Outside
        .step(ParsedLine::Open("<NC>".into()), &mut index)
        .step(ParsedLine::Token(tok("panel", "NN")), &mut index)
        .step(ParsedLine::Blank, &mut index);
    assert_eq!(
        state,
        ChunkState::InsideChunk {
            tag: "<NC>".into(),
            tokens: vec![tok("panel", "NN")],
        }
    );
    assert!(index.is_empty());
}

#[test]
fn classify_distinguishes_open_and_close() {
    assert_eq!(ParsedLine::classify(1, "<NC>").unwrap(), ParsedLine::Open("<NC>".into()));
    assert_eq!(ParsedLine::classify(1, "</NC>").unwrap(), ParsedLine::Close("</NC>".into()));
    assert_eq!(ParsedLine::classify(1, "").unwrap(), ParsedLine::Blank);
    assert_eq!(
        ParsedLine::classify(1, "<\tSYM\t<").unwrap(),
        ParsedLine::Token(tok("<", "SYM"))
    );
}
