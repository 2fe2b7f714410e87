use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::encyclopedia::{Animal, Category, Encyclopedia};
use crate::error::AppError;
use crate::i18n::{Lang, Translations};
use crate::upload::{self, TempUpload, ValidationError, ALLOWED_EXTENSIONS};
use crate::vision::{IdentificationResult, VisionClient};

/// Shared, immutable application state. Built once at startup; handlers only
/// read from it, so no locking is involved.
pub struct AppState {
    pub config: Config,
    pub translations: Translations,
    pub encyclopedia: Encyclopedia,
    pub vision: VisionClient,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        Ok(Self {
            vision: VisionClient::new(&config),
            translations: Translations::curated(),
            encyclopedia: Encyclopedia::curated()?,
            config,
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/", get(index))
        .route("/category/:category_id", get(category_page))
        .route("/animal/:animal_id", get(animal_page))
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct UploadResponse {
    success: bool,
    image_url: String,
    description: String,
}

/// POST /upload: validate, stage to disk, encode as a data URI, and ask the
/// vision model. The staged file is deleted on every exit path by the
/// `TempUpload` guard.
async fn upload(
    State(state): State<Arc<AppState>>,
    lang: Lang,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let t = &state.translations;
    let processing = |err: String| {
        AppError::Processing(format!("{} {}", t.tr(lang, "upload_error_process"), err))
    };

    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| processing(err.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|err| processing(err.to_string()))?;
            file = Some((filename, bytes));
            break;
        }
    }

    let Some((filename, bytes)) = file else {
        return Err(validation_error(t, lang, ValidationError::MissingFile));
    };
    let ext = upload::validate_filename(filename.as_deref())
        .map_err(|err| validation_error(t, lang, err))?;

    let staged = TempUpload::create(&state.config.upload_dir, &ext, &bytes)
        .map_err(|err| processing(err.to_string()))?;
    let content = staged.read().map_err(|err| processing(err.to_string()))?;
    let image_url = upload::data_url(&content, &ext);

    match state.vision.identify(&image_url).await {
        IdentificationResult::Success { text } => Ok(Json(UploadResponse {
            success: true,
            image_url,
            description: text,
        })),
        IdentificationResult::Failure { message } => Err(AppError::Upstream(message)),
    }
}

fn validation_error(t: &Translations, lang: Lang, err: ValidationError) -> AppError {
    let message = match err {
        ValidationError::UnsupportedType => format!(
            "{} ({})",
            t.tr(lang, err.message_key()),
            ALLOWED_EXTENSIONS.join(", ")
        ),
        _ => t.tr(lang, err.message_key()).to_string(),
    };
    AppError::Validation(message)
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

async fn index(State(state): State<Arc<AppState>>, lang: Lang) -> Html<String> {
    let t = &state.translations;

    let categories: String = state
        .encyclopedia
        .categories()
        .iter()
        .map(|c| category_card(&state, lang, c))
        .collect();

    let body = format!(
        r#"<section class="panel">
  <h2>{upload_title}</h2>
  <p class="hint">{upload_hint}</p>
  <form id="uploadForm">
    <input type="file" name="file" id="fileInput" accept="image/*">
    <button type="submit">{upload_button}</button>
  </form>
  <p class="hint">{supported_formats}: {formats} &middot; {max_size}: 16 MB</p>
  <div id="uploadError" class="error" hidden></div>
  <div id="uploadResult" hidden>
    <img id="preview" alt="">
    <h3>{model_result}</h3>
    <pre id="description"></pre>
  </div>
</section>
<section class="panel">
  <h2>{category_title}</h2>
  <div class="grid">{categories}</div>
</section>
<script>{upload_script}</script>"#,
        upload_title = t.tr(lang, "upload_title"),
        upload_hint = t.tr(lang, "upload_hint"),
        upload_button = t.tr(lang, "upload_button"),
        supported_formats = t.tr(lang, "supported_formats"),
        formats = ALLOWED_EXTENSIONS.join(", "),
        max_size = t.tr(lang, "max_size"),
        model_result = t.tr(lang, "model_result"),
        category_title = t.tr(lang, "category_title"),
        categories = categories,
        upload_script = UPLOAD_SCRIPT,
    );

    page(&state, lang, t.tr(lang, "site_title"), body)
}

async fn category_page(
    State(state): State<Arc<AppState>>,
    lang: Lang,
    Path(category_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let t = &state.translations;
    let category = state
        .encyclopedia
        .category(&category_id)
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;
    // id resolved above, the member list is consistent by construction
    let animals = state.encyclopedia.animals_in(&category_id).unwrap_or_default();

    let list: String = animals
        .iter()
        .map(|a| animal_card(&state, lang, a))
        .collect();

    let body = format!(
        r#"<section class="panel">
  <h2>{name}</h2>
  <p class="hint">{description}</p>
  <h3>{animals_in_category}</h3>
  <div class="grid">{list}</div>
  <p><a href="/">&larr; {back_home}</a></p>
</section>"#,
        name = category.name.get(lang),
        description = category.description.get(lang),
        animals_in_category = t.tr(lang, "animals_in_category"),
        list = list,
        back_home = t.tr(lang, "back_home"),
    );

    Ok(page(&state, lang, category.name.get(lang), body))
}

async fn animal_page(
    State(state): State<Arc<AppState>>,
    lang: Lang,
    Path(animal_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let t = &state.translations;
    let animal = state
        .encyclopedia
        .animal(&animal_id)
        .ok_or_else(|| AppError::NotFound("Animal not found".to_string()))?;
    // guaranteed by the load-time integrity check
    let category = state
        .encyclopedia
        .category(animal.category)
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    let characteristics: String = animal
        .characteristics
        .iter()
        .map(|c| format!("<li>{}</li>", c.get(lang)))
        .collect();
    let facts: String = animal
        .facts
        .iter()
        .map(|f| format!("<li>{}</li>", f.get(lang)))
        .collect();

    let body = format!(
        r#"<section class="panel">
  <h2>{name} <small><em>{scientific}</em></small></h2>
  <dl>
    <dt>{scientific_label}</dt><dd><em>{scientific}</em></dd>
    <dt>{status_label}</dt><dd>{status}</dd>
    <dt>{habitat_label}</dt><dd>{habitat}</dd>
    <dt>{distribution_label}</dt><dd>{distribution}</dd>
  </dl>
  <h3>{characteristics_label}</h3>
  <ul>{characteristics}</ul>
  <h3>{facts_label}</h3>
  <ul>{facts}</ul>
  <p><a href="/category/{category_id}">&larr; {category_name}</a>
     &middot; <a href="/">{back_home}</a></p>
</section>"#,
        name = animal.name.get(lang),
        scientific = animal.scientific_name.get(lang),
        scientific_label = t.tr(lang, "scientific_name"),
        status_label = t.tr(lang, "conservation_status"),
        status = animal.conservation_status.get(lang),
        habitat_label = t.tr(lang, "habitat"),
        habitat = animal.habitat.get(lang),
        distribution_label = t.tr(lang, "distribution"),
        distribution = animal.distribution.get(lang),
        characteristics_label = t.tr(lang, "characteristics"),
        characteristics = characteristics,
        facts_label = t.tr(lang, "facts"),
        facts = facts,
        category_id = category.id,
        category_name = category.name.get(lang),
        back_home = t.tr(lang, "back_home"),
    );

    Ok(page(&state, lang, animal.name.get(lang), body))
}

fn category_card(state: &AppState, lang: Lang, category: &Category) -> String {
    format!(
        r#"<div class="card">
  <h3>{name}</h3>
  <p>{description}</p>
  <a href="/category/{id}">{view_category}</a>
</div>"#,
        name = category.name.get(lang),
        description = category.description.get(lang),
        id = category.id,
        view_category = state.translations.tr(lang, "view_category"),
    )
}

fn animal_card(state: &AppState, lang: Lang, animal: &Animal) -> String {
    format!(
        r#"<div class="card">
  <h3>{name}</h3>
  <p><em>{scientific}</em></p>
  <a href="/animal/{id}">{learn_more}</a>
</div>"#,
        name = animal.name.get(lang),
        scientific = animal.scientific_name.get(lang),
        id = animal.id,
        learn_more = state.translations.tr(lang, "learn_more"),
    )
}

/// Common page shell: header with navigation and language selector, footer
/// script that persists the language choice in a cookie.
fn page(state: &AppState, lang: Lang, title: &str, body: String) -> Html<String> {
    let t = &state.translations;
    let options: String = Lang::all()
        .iter()
        .map(|l| {
            format!(
                r#"<option value="{code}"{selected}>{name}</option>"#,
                code = l.code(),
                selected = if *l == lang { " selected" } else { "" },
                name = l.name(),
            )
        })
        .collect();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="{code}">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <style>{style}</style>
</head>
<body>
  <header>
    <a class="brand" href="/">{site_title}</a>
    <nav>
      <a href="/">{nav_home}</a>
      <select id="langSelect">{options}</select>
    </nav>
  </header>
  <main>{body}</main>
  <script>{lang_script}</script>
</body>
</html>"#,
        code = lang.code(),
        title = title,
        style = STYLE,
        site_title = t.tr(lang, "site_title"),
        nav_home = t.tr(lang, "nav_home"),
        options = options,
        body = body,
        lang_script = LANG_SCRIPT,
    ))
}

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
       background: #f4f6fb; color: #333; }
header { display: flex; justify-content: space-between; align-items: center;
         padding: 16px 24px; background: #2b6cb0; color: white; }
header a { color: white; text-decoration: none; margin-right: 12px; }
.brand { font-weight: 700; font-size: 1.2em; }
main { max-width: 880px; margin: 24px auto; padding: 0 16px; }
.panel { background: white; border-radius: 12px; padding: 24px; margin-bottom: 24px;
         box-shadow: 0 2px 8px rgba(0,0,0,0.08); }
.panel h2 { margin-bottom: 12px; }
.panel h3 { margin: 16px 0 8px; }
.hint { color: #666; margin-bottom: 12px; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 16px; }
.card { border: 1px solid #e2e8f0; border-radius: 10px; padding: 16px; }
.card a { color: #2b6cb0; }
button { background: #2b6cb0; color: white; border: none; border-radius: 8px;
         padding: 8px 18px; cursor: pointer; }
.error { background: #fee; border: 1px solid #fcc; color: #c33;
         padding: 12px; border-radius: 8px; margin-top: 12px; }
#preview { max-width: 100%; border-radius: 8px; margin: 12px 0; }
#description { white-space: pre-wrap; font-family: inherit; }
dl dt { font-weight: 600; margin-top: 8px; }
ul { margin-left: 20px; }
"#;

const LANG_SCRIPT: &str = r#"
(function () {
  const sel = document.getElementById("langSelect");
  if (!sel) return;
  sel.addEventListener("change", () => {
    const lang = sel.value;
    document.cookie = `lang=${lang}; path=/; max-age=31536000`;
    const url = new URL(window.location.href);
    url.searchParams.set("lang", lang);
    window.location.href = url.toString();
  });
})();
"#;

const UPLOAD_SCRIPT: &str = r#"
(function () {
  const form = document.getElementById("uploadForm");
  const errorBox = document.getElementById("uploadError");
  const result = document.getElementById("uploadResult");

  form.addEventListener("submit", async (e) => {
    e.preventDefault();
    errorBox.hidden = true;
    result.hidden = true;

    try {
      const response = await fetch("/upload", { method: "POST", body: new FormData(form) });
      const data = await response.json();
      if (!data.success) {
        errorBox.textContent = data.error;
        errorBox.hidden = false;
        return;
      }
      document.getElementById("preview").src = data.image_url;
      document.getElementById("description").textContent = data.description;
      result.hidden = false;
    } catch (err) {
      errorBox.textContent = String(err);
      errorBox.hidden = false;
    }
  });
})();
"#;
