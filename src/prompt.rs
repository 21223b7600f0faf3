//! Render the glossary into the conversion prompt kept in the README.
//!
//! The README carries a prompt for manual LLM-assisted conversion. Its term
//! list sits between a fixed opening line and a fixed placeholder line;
//! everything in between is regenerated from the glossary.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PromptError, PromptResult};
use crate::glossary::Glossary;

/// Line that opens the generated block.
pub const BLOCK_START: &str = "請將以下文本中的技術術語進行轉換。轉換規則如下：";
/// Placeholder line that closes the generated block.
pub const BLOCK_END: &str = "[在此處插入需要轉換的文本]";

static RE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?s)({})(.*?)({})",
        regex::escape(BLOCK_START),
        regex::escape(BLOCK_END)
    ))
    .unwrap()
});

/// The generated text placed between the two markers.
pub fn render_block(glossary: &Glossary) -> String {
    let mut block = String::from("\n### 中國大陸簡體 → 台灣繁體術語對照表：\n");
    for (source, targets) in glossary.iter() {
        block.push_str(&format!("- {source} → {}\n", targets.joined()));
    }
    block.push_str(
        "\n### 轉換指示：\n\
         1. 請將文本中出現的中國大陸術語轉換為對應的台灣術語\n\
         2. 保持其他內容不變\n\
         3. 注意上下文，選擇最合適的轉換詞彙\n\
         4. 如果同一個中國大陸術語有多個台灣對應詞彙，請根據上下文選擇最合適的\n\n\
         ### 要轉換的文本：\n",
    );
    block
}

/// Replace every marked block in `readme` with a freshly rendered one.
///
/// Returns `None` if the markers are missing.
pub fn render_prompt(readme: &str, glossary: &Glossary) -> Option<String> {
    if !RE_BLOCK.is_match(readme) {
        return None;
    }
    let block = render_block(glossary);
    let out = RE_BLOCK.replace_all(readme, |caps: &regex::Captures<'_>| {
        format!("{}{block}{}", &caps[1], &caps[3])
    });
    Some(out.into_owned())
}

/// Rewrite the README at `path` in place.
pub fn update_readme(path: &Path, glossary: &Glossary) -> PromptResult<()> {
    let io_err = |e: std::io::Error| PromptError::Io {
        path: path.display().to_string(),
        source: e,
    };
    let readme = std::fs::read_to_string(path).map_err(io_err)?;
    let updated = render_prompt(&readme, glossary).ok_or_else(|| PromptError::MarkersNotFound {
        path: path.display().to_string(),
    })?;
    std::fs::write(path, updated).map_err(io_err)?;
    tracing::info!(path = %path.display(), terms = glossary.len(), "updated prompt block");
    Ok(())
}
