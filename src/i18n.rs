use std::collections::HashMap;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

/// Supported UI languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    En,
    Zh,
    Ko,
}

impl Lang {
    pub const DEFAULT: Lang = Lang::En;

    pub fn all() -> &'static [Lang] {
        &[Lang::En, Lang::Zh, Lang::Ko]
    }

    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Zh => "zh",
            Lang::Ko => "ko",
        }
    }

    /// Native display name, used by the language selector.
    pub fn name(&self) -> &'static str {
        match self {
            Lang::En => "English",
            Lang::Zh => "中文",
            Lang::Ko => "한국어",
        }
    }

    /// Unknown codes normalize silently to the default language.
    pub fn parse(code: &str) -> Lang {
        match code {
            "zh" => Lang::Zh,
            "ko" => Lang::Ko,
            _ => Lang::En,
        }
    }
}

/// Derives the active language once per request: the `lang` query parameter
/// wins over the `lang` cookie; anything unrecognized falls back to English.
#[async_trait]
impl<S> FromRequestParts<S> for Lang
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(code) = parts.uri.query().and_then(query_param_lang) {
            return Ok(Lang::parse(code));
        }
        let cookie = parts
            .headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(cookie_lang);
        Ok(cookie.map(Lang::parse).unwrap_or(Lang::DEFAULT))
    }
}

fn query_param_lang(query: &str) -> Option<&str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == "lang")
        .map(|(_, v)| v)
}

fn cookie_lang(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(k, _)| *k == "lang")
        .map(|(_, v)| v)
}

/// UI string table. English is the complete reference table; other languages
/// may lag behind it and fall back per key.
pub struct Translations {
    tables: HashMap<Lang, HashMap<&'static str, &'static str>>,
}

impl Translations {
    /// Looks up `key` for `lang`, falling back to English and finally to the
    /// key itself. Total: never fails.
    pub fn tr<'a>(&'a self, lang: Lang, key: &'a str) -> &'a str {
        self.tables
            .get(&lang)
            .and_then(|t| t.get(key))
            .or_else(|| self.tables.get(&Lang::DEFAULT).and_then(|t| t.get(key)))
            .copied()
            .unwrap_or(key)
    }

    pub fn curated() -> Self {
        let en = HashMap::from([
            ("site_title", "Animal Vision & Encyclopedia"),
            ("nav_home", "Home"),
            ("nav_encyclopedia", "Encyclopedia"),
            ("upload_title", "Animal Identification"),
            (
                "upload_hint",
                "Upload an image to identify animals using a vision model.",
            ),
            ("upload_button", "Upload & Identify"),
            ("supported_formats", "Supported formats"),
            ("max_size", "Max size"),
            ("category_title", "Categories"),
            ("view_category", "View Category"),
            ("back_home", "Back to Home"),
            ("animals_in_category", "Animals in this category"),
            ("learn_more", "Learn more"),
            ("scientific_name", "Scientific name"),
            ("conservation_status", "Conservation status"),
            ("habitat", "Habitat"),
            ("distribution", "Distribution"),
            ("characteristics", "Key characteristics"),
            ("facts", "Fun facts"),
            ("upload_error_no_file", "No file uploaded."),
            ("upload_error_empty", "No file selected."),
            ("upload_error_type", "Unsupported file format."),
            ("upload_error_process", "Processing failed."),
            ("model_result", "Model description"),
        ]);
        let zh = HashMap::from([
            ("site_title", "动物识别与动物百科"),
            ("nav_home", "首页"),
            ("nav_encyclopedia", "动物百科"),
            ("upload_title", "动物识别"),
            ("upload_hint", "上传图片，使用视觉模型识别动物并生成科普介绍。"),
            ("upload_button", "上传并识别"),
            ("supported_formats", "支持格式"),
            ("max_size", "最大大小"),
            ("category_title", "动物分类"),
            ("view_category", "查看分类"),
            ("back_home", "返回首页"),
            ("animals_in_category", "本分类动物"),
            ("learn_more", "了解更多"),
            ("scientific_name", "学名"),
            ("conservation_status", "保护等级"),
            ("habitat", "栖息地"),
            ("distribution", "分布范围"),
            ("characteristics", "主要特征"),
            ("facts", "有趣事实"),
            ("upload_error_no_file", "没有文件上传。"),
            ("upload_error_empty", "没有选择文件。"),
            ("upload_error_type", "不支持的文件格式。"),
            ("upload_error_process", "处理失败。"),
            ("model_result", "模型描述"),
        ]);
        let ko = HashMap::from([
            ("site_title", "동물 인식 & 동물 백과"),
            ("nav_home", "홈"),
            ("nav_encyclopedia", "백과"),
            ("upload_title", "동물 인식"),
            (
                "upload_hint",
                "이미지를 업로드하면 시각 모델이 동물을 식별하고 설명을 생성합니다.",
            ),
            ("upload_button", "업로드 및 인식"),
            ("supported_formats", "지원 형식"),
            ("max_size", "최대 크기"),
            ("category_title", "분류"),
            ("view_category", "카테고리 보기"),
            ("back_home", "홈으로"),
            ("animals_in_category", "이 카테고리의 동물"),
            ("learn_more", "더 알아보기"),
            ("scientific_name", "학명"),
            ("conservation_status", "보전 상태"),
            ("habitat", "서식지"),
            ("distribution", "분포"),
            ("characteristics", "주요 특징"),
            ("facts", "재미있는 사실"),
            ("upload_error_no_file", "파일이 업로드되지 않았습니다."),
            ("upload_error_empty", "파일을 선택하지 않았습니다."),
            ("upload_error_type", "지원하지 않는 파일 형식입니다."),
            ("upload_error_process", "처리 실패."),
            ("model_result", "모델 설명"),
        ]);

        Self {
            tables: HashMap::from([(Lang::En, en), (Lang::Zh, zh), (Lang::Ko, ko)]),
        }
    }
}

/// A data field translated per language, as opposed to a UI string.
#[derive(Debug, Clone)]
pub struct Localized {
    values: HashMap<Lang, &'static str>,
}

impl Localized {
    pub fn new(en: &'static str, zh: &'static str, ko: &'static str) -> Self {
        Self {
            values: HashMap::from([(Lang::En, en), (Lang::Zh, zh), (Lang::Ko, ko)]),
        }
    }

    /// For fields that are the same in every language, e.g. Latin names.
    pub fn invariant(value: &'static str) -> Self {
        Self {
            values: HashMap::from([(Lang::En, value)]),
        }
    }

    /// Requested language, else English, else any entry, else empty.
    pub fn get(&self, lang: Lang) -> &str {
        self.values
            .get(&lang)
            .or_else(|| self.values.get(&Lang::DEFAULT))
            .or_else(|| self.values.values().next())
            .copied()
            .unwrap_or("")
    }
}

/// Shorthand used by the encyclopedia data tables.
pub fn loc(en: &'static str, zh: &'static str, ko: &'static str) -> Localized {
    Localized::new(en, zh, ko)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn unknown_codes_normalize_to_english() {
        for code in ["fr", "EN", "", "zh-CN", "klingon"] {
            assert_eq!(Lang::parse(code), Lang::En);
        }
        assert_eq!(Lang::parse("zh"), Lang::Zh);
        assert_eq!(Lang::parse("ko"), Lang::Ko);
    }

    #[test]
    fn tr_falls_back_to_english_then_key() {
        let t = Translations::curated();
        assert_eq!(t.tr(Lang::Zh, "nav_home"), "首页");
        // Key present only in the default table resolves the same for every
        // language.
        for lang in Lang::all() {
            assert_eq!(
                t.tr(*lang, "no_such_key_anywhere"),
                "no_such_key_anywhere"
            );
        }
        assert_eq!(t.tr(Lang::Ko, "site_title"), "동물 인식 & 동물 백과");
    }

    #[test]
    fn tr_behaves_like_english_for_unknown_lang_values() {
        let t = Translations::curated();
        for key in ["site_title", "upload_button", "facts"] {
            assert_eq!(t.tr(Lang::parse("xx"), key), t.tr(Lang::En, key));
        }
    }

    #[test]
    fn localized_fallback_chain() {
        let l = Localized::new("lion", "狮子", "사자");
        assert_eq!(l.get(Lang::Zh), "狮子");

        let latin = Localized::invariant("Panthera leo");
        assert_eq!(latin.get(Lang::Ko), "Panthera leo");

        let empty = Localized {
            values: HashMap::new(),
        };
        assert_eq!(empty.get(Lang::En), "");
    }

    #[tokio::test]
    async fn query_param_wins_over_cookie() {
        let (mut parts, _) = Request::builder()
            .uri("/?lang=zh")
            .header("cookie", "lang=ko")
            .body(())
            .unwrap()
            .into_parts();
        let lang = Lang::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(lang, Lang::Zh);
    }

    #[tokio::test]
    async fn cookie_applies_when_no_query_param() {
        let (mut parts, _) = Request::builder()
            .uri("/category/mammals")
            .header("cookie", "theme=dark; lang=ko")
            .body(())
            .unwrap()
            .into_parts();
        let lang = Lang::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(lang, Lang::Ko);
    }

    #[tokio::test]
    async fn bare_request_defaults_to_english() {
        let (mut parts, _) = Request::builder()
            .uri("/")
            .body(())
            .unwrap()
            .into_parts();
        let lang = Lang::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(lang, Lang::En);
    }
}
