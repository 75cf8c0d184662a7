//! Fetched pages and the forms found on them.
//!
//! Documents are re-parsed on each query so no parsed DOM is held across an
//! `.await`.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use reqwest::Method;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::consts::{ERROR_MARKER_SELECTOR, UNSPECIFIED_REMOTE_ERROR};
use crate::error::ComponentError;

static ERROR_MARKER: LazyLock<Selector> =
  LazyLock::new(|| Selector::parse(ERROR_MARKER_SELECTOR).expect("Failed to compile error marker selector"));

static FORM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("form").expect("Failed to compile form selector"));

static FORM_CONTROL: LazyLock<Selector> =
  LazyLock::new(|| Selector::parse("input, select, textarea").expect("Failed to compile form control selector"));

static OPTION: LazyLock<Selector> =
  LazyLock::new(|| Selector::parse("option").expect("Failed to compile option selector"));

static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("Failed to compile row selector"));

static TABLE: LazyLock<Selector> =
  LazyLock::new(|| Selector::parse("table").expect("Failed to compile table selector"));

static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("Failed to compile cell selector"));

static RADIO: LazyLock<Selector> =
  LazyLock::new(|| Selector::parse(r#"input[type="radio"]"#).expect("Failed to compile radio selector"));

/// A page returned by the server
#[derive(Debug, Clone)]
pub struct HtmlPage {
  url: Url,
  body: String,
}

/// A table row holding a radio control, keyed by the row's first cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioRow {
  pub label: String,
  pub control: String,
}

impl HtmlPage {
  pub fn new(url: Url, body: impl Into<String>) -> Self {
    Self {
      url,
      body: body.into(),
    }
  }

  /// Final URL of the page, after redirects
  pub fn url(&self) -> &Url {
    &self.url
  }

  pub fn body(&self) -> &str {
    &self.body
  }

  fn document(&self) -> Html {
    Html::parse_document(&self.body)
  }

  /// Text of the error marker, if the page carries one. Never empty.
  pub fn error_message(&self) -> Option<String> {
    let document = self.document();
    let marker = document.select(&ERROR_MARKER).next()?;

    let text = visible_text(marker);
    if text.is_empty() {
      Some(UNSPECIFIED_REMOTE_ERROR.to_string())
    } else {
      Some(text)
    }
  }

  /// Value of `attribute` on the first element matching `selector`
  pub fn attribute(&self, selector: &str, attribute: &str) -> Result<Option<String>> {
    let selector = Selector::parse(selector).map_err(|e| anyhow::anyhow!("Invalid selector '{selector}': {e:?}"))?;
    let document = self.document();

    Ok(
      document
        .select(&selector)
        .find_map(|el| el.value().attr(attribute))
        .map(str::to_string),
    )
  }

  /// The first form that has a control named `field`
  pub fn form_with_field(&self, field: &str) -> Result<Form> {
    let document = self.document();

    for element in document.select(&FORM) {
      let form = Form::from_element(element, &self.url)?;
      if form.has_control(field) {
        return Ok(form);
      }
    }

    Err(anyhow::anyhow!("No form with a '{}' field on {}", field, self.url))
  }

  /// Rows of every table on the page that contain a radio control.
  /// Layout rows wrapping a nested table are skipped.
  pub fn radio_rows(&self) -> Vec<RadioRow> {
    let document = self.document();

    document
      .select(&ROW)
      .filter(|row| row.select(&TABLE).next().is_none())
      .filter_map(|row| {
        let control = row.select(&RADIO).next()?.value().attr("name")?;
        let label = row.select(&CELL).next().map(visible_text)?;
        Some(RadioRow {
          label,
          control: control.to_string(),
        })
      })
      .collect()
  }
}

/// Pass the page through unless it carries the error marker.
pub fn check_for_errors(page: HtmlPage) -> Result<HtmlPage> {
  match page.error_message() {
    Some(message) => Err(ComponentError::RemoteValidation(message).into()),
    None => Ok(page),
  }
}

/// Rendered text of an element: whitespace collapsed, scripts and styles
/// skipped.
pub fn visible_text(element: ElementRef<'_>) -> String {
  let mut words = Vec::new();
  collect_words(element, &mut words);
  words.join(" ")
}

fn collect_words<'a>(element: ElementRef<'a>, words: &mut Vec<&'a str>) {
  for child in element.children() {
    if let Some(text) = child.value().as_text() {
      words.extend(text.split_whitespace());
    } else if let Some(child_element) = ElementRef::wrap(child)
      && !matches!(child_element.value().name(), "script" | "style")
    {
      collect_words(child_element, words);
    }
  }
}

/// A form extracted from a page, with the values a browser would submit
#[derive(Debug, Clone)]
pub struct Form {
  action: Url,
  method: Method,
  fields: Vec<(String, String)>,
  controls: Vec<String>,
  submit: Option<(String, String)>,
}

impl Form {
  /// Read a form element. The action is resolved against `page_url`.
  pub fn from_element(form: ElementRef<'_>, page_url: &Url) -> Result<Self> {
    let action = match form.value().attr("action").map(str::trim).filter(|a| !a.is_empty()) {
      Some(action) => page_url
        .join(action)
        .with_context(|| format!("Invalid form action '{action}' on {page_url}"))?,
      None => page_url.clone(),
    };
    let method = match form.value().attr("method") {
      Some(m) if m.eq_ignore_ascii_case("post") => Method::POST,
      _ => Method::GET,
    };

    let mut fields = Vec::new();
    let mut controls = Vec::new();
    let mut submit = None;

    for control in form.select(&FORM_CONTROL) {
      let element = control.value();
      let Some(name) = element.attr("name") else {
        continue;
      };
      if element.attr("disabled").is_some() {
        continue;
      }
      controls.push(name.to_string());

      match element.name() {
        "input" => {
          let kind = element.attr("type").unwrap_or("text").to_ascii_lowercase();
          let value = element.attr("value").unwrap_or_default();
          match kind.as_str() {
            "submit" | "image" => {
              if submit.is_none() {
                submit = Some((name.to_string(), value.to_string()));
              }
            }
            "button" | "reset" | "file" => {}
            "radio" | "checkbox" => {
              if element.attr("checked").is_some() {
                let value = if value.is_empty() { "on" } else { value };
                fields.push((name.to_string(), value.to_string()));
              }
            }
            _ => fields.push((name.to_string(), value.to_string())),
          }
        }
        "select" => {
          let options: Vec<ElementRef<'_>> = control.select(&OPTION).collect();
          let mut selected: Vec<ElementRef<'_>> = options
            .iter()
            .copied()
            .filter(|o| o.value().attr("selected").is_some())
            .collect();
          if selected.is_empty() && element.attr("multiple").is_none() {
            selected.extend(options.first().copied());
          }
          for option in selected {
            let value = option
              .value()
              .attr("value")
              .map(str::to_string)
              .unwrap_or_else(|| visible_text(option));
            fields.push((name.to_string(), value));
          }
        }
        "textarea" => fields.push((name.to_string(), control.text().collect())),
        _ => {}
      }
    }

    Ok(Self {
      action,
      method,
      fields,
      controls,
      submit,
    })
  }

  pub fn action(&self) -> &Url {
    &self.action
  }

  pub fn method(&self) -> &Method {
    &self.method
  }

  /// Whether the form contains a control with this name, set or not
  pub fn has_control(&self, name: &str) -> bool {
    self.controls.iter().any(|c| c == name)
  }

  /// Current value of a field
  pub fn get(&self, name: &str) -> Option<&str> {
    self
      .fields
      .iter()
      .find(|(field, _)| field == name)
      .map(|(_, value)| value.as_str())
  }

  /// Replace every value of `name` with `value`
  pub fn set(&mut self, name: &str, value: impl Into<String>) {
    self.fields.retain(|(field, _)| field != name);
    self.fields.push((name.to_string(), value.into()));
  }

  /// Name/value pairs sent on submission, including the submit button
  pub fn submission(&self) -> Vec<(String, String)> {
    let mut pairs = self.fields.clone();
    pairs.extend(self.submit.clone());
    pairs
  }
}
