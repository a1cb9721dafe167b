use pos_tagger::cli::{run, TAGGING_FAILURE};
use pos_tagger::common::config::{DeviceOption, TaggerConfig};
use pos_tagger::pipelines::environment::prepare_model;
use pos_tagger::pipelines::pos_tagging::{tag_text, POSTag, TokenTagger};
use pos_tagger::PosTaggerError;

/// Splits on whitespace and trailing punctuation, labels from a small lexicon
struct LexiconTagger;

impl LexiconTagger {
    fn label(word: &str) -> &'static str {
        match word.to_lowercase().as_str() {
            "the" | "a" => "DET",
            "sat" | "ran" => "VERB",
            _ if word.chars().all(|c| c.is_ascii_punctuation()) => "PUNCT",
            _ => "NOUN",
        }
    }

    fn push(tags: &mut Vec<POSTag>, word: &str) {
        tags.push(POSTag {
            word: word.to_string(),
            score: 1.0,
            label: Self::label(word).to_string(),
        });
    }
}

impl TokenTagger for LexiconTagger {
    fn tag(&self, text: &str) -> Result<Vec<POSTag>, PosTaggerError> {
        let mut tags = Vec::new();
        for chunk in text.split_whitespace() {
            let word = chunk.trim_end_matches(|c: char| c.is_ascii_punctuation());
            if !word.is_empty() {
                Self::push(&mut tags, word);
            }
            for punctuation in chunk[word.len()..].chars() {
                Self::push(&mut tags, &punctuation.to_string());
            }
        }
        Ok(tags)
    }
}

struct FailingTagger;

impl TokenTagger for FailingTagger {
    fn tag(&self, _text: &str) -> Result<Vec<POSTag>, PosTaggerError> {
        Err(PosTaggerError::TaggingError(String::from("model exploded")))
    }
}

fn run_on(model: &dyn TokenTagger, input: &[u8]) -> (i32, String, String) {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let status = run(model, input, &mut stdout, &mut stderr);
    (
        status,
        String::from_utf8_lossy(&stdout).into_owned(),
        String::from_utf8_lossy(&stderr).into_owned(),
    )
}

#[test]
fn empty_input_prints_empty_line() {
    let (status, stdout, stderr) = run_on(&LexiconTagger, b"");
    assert_eq!(status, 0);
    assert_eq!(stdout, "\n");
    assert!(stderr.is_empty());
}

#[test]
fn units_follow_token_order() -> anyhow::Result<()> {
    let output = tag_text("The cat sat.", &LexiconTagger)?;
    assert_eq!(output, "The_DET cat_NOUN sat_VERB ._PUNCT");

    let (status, stdout, _) = run_on(&LexiconTagger, b"The cat sat.\n");
    assert_eq!(status, 0);
    assert_eq!(stdout, "The_DET cat_NOUN sat_VERB ._PUNCT\n");
    Ok(())
}

#[test]
fn unit_count_matches_token_count() -> anyhow::Result<()> {
    let text = "A cat ran, the dog sat!  Then   nothing?";
    let tokens = LexiconTagger.tag(text)?;
    let output = tag_text(text, &LexiconTagger)?;
    let units = output.split(' ').collect::<Vec<&str>>();

    assert_eq!(units.len(), tokens.len());
    for (unit, token) in units.iter().zip(tokens.iter()) {
        assert_eq!(*unit, format!("{}_{}", token.word, token.label));
    }
    Ok(())
}

#[test]
fn tagging_is_idempotent() -> anyhow::Result<()> {
    let text = "The cat sat on the mat.";
    assert_eq!(
        tag_text(text, &LexiconTagger)?,
        tag_text(text, &LexiconTagger)?
    );
    Ok(())
}

#[test]
fn tagging_failure_exits_with_error() {
    let (status, stdout, stderr) = run_on(&FailingTagger, b"The cat sat.");
    assert_eq!(status, TAGGING_FAILURE);
    assert!(stdout.is_empty());
    assert_eq!(stderr, "Error in tag_text: model exploded\n");
}

#[test]
fn invalid_utf8_input_is_a_tagging_failure() {
    let (status, stdout, stderr) = run_on(&LexiconTagger, &[0x54, 0x68, 0xff, 0xfe]);
    assert_eq!(status, TAGGING_FAILURE);
    assert!(stdout.is_empty());
    assert!(stderr.starts_with("Error in tag_text: IO error:"));
}

#[test]
#[cfg_attr(not(feature = "all-tests"), ignore)]
fn pretrained_model_tags_sentence() -> anyhow::Result<()> {
    //    Set-up model
    let config = TaggerConfig {
        device: DeviceOption::Cpu,
        ..Default::default()
    };
    let pos_model = prepare_model(&config)?;

    //    Run model
    let output = tag_text("The cat sat.", &pos_model)?;
    let tokens = pos_model.tag("The cat sat.")?;

    let units = output.split(' ').collect::<Vec<&str>>();
    assert_eq!(units.len(), tokens.len());
    let words = units
        .iter()
        .map(|unit| unit.rsplit_once('_').map(|(word, _)| word))
        .collect::<Vec<Option<&str>>>();
    assert_eq!(words, [Some("The"), Some("cat"), Some("sat"), Some(".")]);
    for unit in &units {
        let (_, label) = unit.rsplit_once('_').unwrap();
        assert!(!label.is_empty());
        assert!(label.chars().all(|c| c.is_ascii_uppercase()));
    }

    assert_eq!(output, tag_text("The cat sat.", &pos_model)?);
    assert_eq!(tag_text("", &pos_model)?, "");
    assert_eq!(tag_text(" \n\t", &pos_model)?, "");
    Ok(())
}
