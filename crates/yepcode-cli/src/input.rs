//! Turning CLI input into the code blocks handed to the executor.

use yepcode_core::extractor::UNKNOWN_LANGUAGE;
use yepcode_core::CodeBlock;

/// Applies the `--language` default to extracted blocks.
///
/// Untagged blocks take the default language. When the input has no fences at
/// all and a default is given, the whole input becomes one block; without a
/// default nothing is run.
pub fn prepare_blocks(
    extracted: Vec<CodeBlock>,
    source: &str,
    default_language: Option<&str>,
) -> Vec<CodeBlock> {
    match default_language {
        None => extracted,
        Some(language) if extracted.is_empty() => {
            if source.trim().is_empty() {
                Vec::new()
            } else {
                vec![CodeBlock::new(language, source)]
            }
        }
        Some(language) => extracted
            .into_iter()
            .map(|block| {
                if block.language == UNKNOWN_LANGUAGE {
                    CodeBlock::new(language, block.code)
                } else {
                    block
                }
            })
            .collect(),
    }
}

/// True when the input has content but yielded no runnable block, which
/// happens for plain source files passed without `--language`.
pub fn needs_language_hint(blocks: &[CodeBlock], source: &str) -> bool {
    blocks.is_empty() && !source.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_untouched_without_default() {
        let blocks = vec![CodeBlock::new(UNKNOWN_LANGUAGE, "echo hi")];
        assert_eq!(prepare_blocks(blocks.clone(), "", None), blocks);
    }

    #[test]
    fn test_default_fills_untagged_blocks() {
        let blocks = vec![
            CodeBlock::new("js", "return 1"),
            CodeBlock::new(UNKNOWN_LANGUAGE, "print(2)"),
        ];
        assert_eq!(
            prepare_blocks(blocks, "", Some("python")),
            vec![CodeBlock::new("js", "return 1"), CodeBlock::new("python", "print(2)")]
        );
    }

    #[test]
    fn test_plain_source_becomes_single_block() {
        let source = "print('hello')\n";
        assert_eq!(
            prepare_blocks(Vec::new(), source, Some("py")),
            vec![CodeBlock::new("py", source)]
        );
    }

    #[test]
    fn test_empty_input_runs_nothing() {
        assert!(prepare_blocks(Vec::new(), "  \n", Some("python")).is_empty());
        assert!(prepare_blocks(Vec::new(), "print(1)", None).is_empty());
    }

    #[test]
    fn test_language_hint_for_plain_source() {
        let source = "print('hello')\n";
        let blocks = prepare_blocks(Vec::new(), source, None);
        assert!(needs_language_hint(&blocks, source));
    }

    #[test]
    fn test_no_language_hint_when_blocks_or_blank_input() {
        assert!(!needs_language_hint(&[], " \n"));
        let blocks = vec![CodeBlock::new("python", "print(1)")];
        assert!(!needs_language_hint(&blocks, "```python\nprint(1)\n```"));
    }
}
