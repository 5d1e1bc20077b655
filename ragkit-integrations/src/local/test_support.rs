//! Small in-memory tokenizers and model configs for unit tests.

use serde_json::json;
use tokenizers::Tokenizer;

/// Vocabulary size of the tiny model configs.
pub(crate) const TINY_VOCAB_SIZE: usize = 32;

/// Word-level tokenizer over `words` (ids follow list order) with BERT-style
/// `[CLS] ... [SEP]` post-processing. `words` must contain `[CLS]`, `[SEP]`
/// and `[UNK]`.
pub(crate) fn word_tokenizer(words: &[&str]) -> Tokenizer {
    let id = |token: &str| {
        words
            .iter()
            .position(|word| *word == token)
            .unwrap_or_else(|| panic!("{token} missing from test vocabulary"))
    };
    let vocab: serde_json::Map<String, serde_json::Value> = words
        .iter()
        .enumerate()
        .map(|(i, word)| ((*word).to_string(), json!(i)))
        .collect();

    json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": null,
        "pre_tokenizer": {"type": "Whitespace"},
        "post_processor": {
            "type": "BertProcessing",
            "sep": ["[SEP]", id("[SEP]")],
            "cls": ["[CLS]", id("[CLS]")]
        },
        "decoder": null,
        "model": {"type": "WordLevel", "vocab": vocab, "unk_token": "[UNK]"}
    })
    .to_string()
    .parse()
    .unwrap()
}

/// One-layer Llama `config.json`.
pub(crate) fn tiny_llama_config() -> String {
    json!({
        "model_type": "llama",
        "hidden_size": 8,
        "intermediate_size": 16,
        "vocab_size": TINY_VOCAB_SIZE,
        "num_hidden_layers": 1,
        "num_attention_heads": 2,
        "num_key_value_heads": 1,
        "rms_norm_eps": 1e-5,
        "rope_theta": 10000.0,
        "max_position_embeddings": 64,
        "bos_token_id": 1,
        "eos_token_id": 2,
        "tie_word_embeddings": false
    })
    .to_string()
}

/// One-layer Qwen2 `config.json`.
pub(crate) fn tiny_qwen2_config() -> String {
    json!({
        "model_type": "qwen2",
        "vocab_size": TINY_VOCAB_SIZE,
        "hidden_size": 8,
        "intermediate_size": 16,
        "num_hidden_layers": 1,
        "num_attention_heads": 2,
        "num_key_value_heads": 1,
        "max_position_embeddings": 64,
        "sliding_window": 64,
        "max_window_layers": 1,
        "tie_word_embeddings": false,
        "rope_theta": 10000.0,
        "rms_norm_eps": 1e-6,
        "use_sliding_window": false,
        "hidden_act": "silu"
    })
    .to_string()
}

/// `[PAD] [UNK] [CLS] [SEP] w4 .. w31`, so every id of the tiny models
/// decodes to a word.
pub(crate) fn tiny_vocab() -> Vec<String> {
    ["[PAD]", "[UNK]", "[CLS]", "[SEP]"]
        .into_iter()
        .map(str::to_string)
        .chain((4..TINY_VOCAB_SIZE).map(|i| format!("w{i}")))
        .collect()
}
