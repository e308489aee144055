/// 按非字母数字字符切分并转小写
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// `phrase` 的单词是否在 `words` 中连续出现
pub fn contains_phrase(words: &[String], phrase: &str) -> bool {
    let needle = tokenize(phrase);
    !needle.is_empty() && words.windows(needle.len()).any(|w| w == needle.as_slice())
}
