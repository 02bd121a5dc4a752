use crate::error::NavigationError;
use crate::parsers::css;
use reqwest::Url;
use scraper::{ElementRef, Html};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Get,
    Post,
}

/// One successful-control candidate of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Text, hidden, checked radio/checkbox inputs and textareas.
    Field { name: String, value: String },
    /// A single-choice `<select>`; `value` is the currently selected option.
    Select {
        name: String,
        value: Option<String>,
        options: Vec<String>,
    },
    /// Only submitted when it is the control that was clicked.
    Submit { name: String, value: String },
}

/// A `<form>` as a browser would hold it: where it posts and what it sends.
#[derive(Debug, Clone)]
pub struct Form {
    pub action: Url,
    pub method: FormMethod,
    pub controls: Vec<Control>,
}

impl Form {
    pub fn has_select(&self, name: &str) -> bool {
        self.controls
            .iter()
            .any(|c| matches!(c, Control::Select { name: n, .. } if n == name))
    }

    pub fn has_submit(&self, name: &str) -> bool {
        self.controls
            .iter()
            .any(|c| matches!(c, Control::Submit { name: n, .. } if n == name))
    }

    /// Chooses `value` in the `<select>` named `name`.
    pub fn select(&mut self, name: &str, value: &str) -> Result<(), NavigationError> {
        let control = self.controls.iter_mut().find_map(|c| match c {
            Control::Select {
                name: n,
                value,
                options,
            } if n == name => Some((value, options)),
            _ => None,
        });

        let Some((selected, options)) = control else {
            return Err(NavigationError::ControlNotFound(name.to_string()));
        };
        if !options.iter().any(|o| o == value) {
            return Err(NavigationError::OptionNotFound {
                control: name.to_string(),
                value: value.to_string(),
            });
        }

        *selected = Some(value.to_string());
        Ok(())
    }

    /// Name/value pairs sent when the submit control `clicked` is pressed,
    /// in document order.
    pub fn submission(&self, clicked: &str) -> Result<Vec<(String, String)>, NavigationError> {
        if !self.has_submit(clicked) {
            return Err(NavigationError::ControlNotFound(clicked.to_string()));
        }

        let mut params = Vec::with_capacity(self.controls.len());
        let mut clicked_sent = false;
        for control in &self.controls {
            match control {
                Control::Field { name, value } => params.push((name.clone(), value.clone())),
                Control::Select {
                    name,
                    value: Some(value),
                    ..
                } => params.push((name.clone(), value.clone())),
                Control::Select { value: None, .. } => {}
                Control::Submit { name, value } => {
                    if name == clicked && !clicked_sent {
                        params.push((name.clone(), value.clone()));
                        clicked_sent = true;
                    }
                }
            }
        }

        Ok(params)
    }
}

/// Reads every `<form>` on a page. Relative actions resolve against `page_url`.
pub fn parse_forms(html: &str, page_url: &Url) -> Result<Vec<Form>, NavigationError> {
    let document = Html::parse_document(html);
    let form_selector = css("form")?;
    let control_selector = css("input, select, textarea, button")?;
    let option_selector = css("option")?;

    let mut forms = Vec::new();
    for form in document.select(&form_selector) {
        let action = match form.value().attr("action").map(str::trim) {
            Some(action) if !action.is_empty() => page_url
                .join(action)
                .map_err(|e| NavigationError::InvalidUrl(format!("{}: {}", action, e)))?,
            _ => page_url.clone(),
        };
        let method = match form.value().attr("method") {
            Some(m) if m.eq_ignore_ascii_case("post") => FormMethod::Post,
            _ => FormMethod::Get,
        };

        let controls = form
            .select(&control_selector)
            .filter_map(|element| read_control(element, &option_selector))
            .collect();

        forms.push(Form {
            action,
            method,
            controls,
        });
    }

    Ok(forms)
}

fn read_control(element: ElementRef<'_>, option_selector: &scraper::Selector) -> Option<Control> {
    let el = element.value();
    if el.attr("disabled").is_some() {
        return None;
    }
    let name = el.attr("name").filter(|n| !n.is_empty())?.to_string();

    match el.name() {
        "input" => {
            let kind = el.attr("type").unwrap_or("text").to_ascii_lowercase();
            let value = el.attr("value").unwrap_or_default().to_string();
            match kind.as_str() {
                "submit" | "image" => Some(Control::Submit { name, value }),
                "button" | "reset" | "file" => None,
                "radio" | "checkbox" => el.attr("checked").map(|_| Control::Field {
                    name,
                    value: el.attr("value").unwrap_or("on").to_string(),
                }),
                _ => Some(Control::Field { name, value }),
            }
        }
        "select" => {
            let mut options = Vec::new();
            let mut selected = None;
            for option in element.select(option_selector) {
                let value = option
                    .value()
                    .attr("value")
                    .map(str::to_string)
                    .unwrap_or_else(|| option.text().collect::<String>().trim().to_string());
                if option.value().attr("selected").is_some() {
                    selected = Some(value.clone());
                }
                options.push(value);
            }
            let value = selected.or_else(|| options.first().cloned());
            Some(Control::Select {
                name,
                value,
                options,
            })
        }
        "textarea" => Some(Control::Field {
            name,
            value: element.text().collect(),
        }),
        "button" => match el.attr("type").map(str::to_ascii_lowercase).as_deref() {
            None | Some("submit") => Some(Control::Submit {
                name,
                value: el.attr("value").unwrap_or_default().to_string(),
            }),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <form method="post" action="HZSKVTSC.P_ProcRequest">
            <input type="hidden" name="CAMPUS" value="0">
            <select name="TERMYEAR">
              <option value="202401">Spring 2024</option>
              <option value="202409" selected>Fall 2024</option>
            </select>
            <select name="subj_code">
              <option value="%">All Subjects</option>
              <option value="CS">CS - Computer Science</option>
              <option value="MATH">MATH - Mathematics</option>
            </select>
            <input type="checkbox" name="open_only" value="on">
            <input type="radio" name="sess" value="A" checked>
            <input type="radio" name="sess" value="B">
            <input type="text" name="crn" disabled value="1">
            <input type="submit" name="BTN_PRESSED" value="FIND class sections">
            <input type="reset" name="reset" value="Reset">
          </form>
        </body></html>
    "#;

    fn page_url() -> Url {
        Url::parse("https://apps.example.edu/ssb/HZSKVTSC.P_ProcRequest").unwrap()
    }

    #[test]
    fn reads_controls_in_document_order() {
        let forms = parse_forms(PAGE, &page_url()).unwrap();
        assert_eq!(forms.len(), 1);
        let form = &forms[0];

        assert_eq!(form.method, FormMethod::Post);
        assert_eq!(form.action.as_str(), "https://apps.example.edu/ssb/HZSKVTSC.P_ProcRequest");
        assert!(form.has_select("TERMYEAR"));
        assert!(form.has_select("subj_code"));
        assert!(form.has_submit("BTN_PRESSED"));
        assert!(!form.has_submit("reset"));
    }

    #[test]
    fn submission_round_trips_fields_and_clicked_button() {
        let mut form = parse_forms(PAGE, &page_url()).unwrap().remove(0);
        form.select("subj_code", "CS").unwrap();

        let params = form.submission("BTN_PRESSED").unwrap();
        let expected: Vec<(String, String)> = [
            ("CAMPUS", "0"),
            ("TERMYEAR", "202409"),
            ("subj_code", "CS"),
            ("sess", "A"),
            ("BTN_PRESSED", "FIND class sections"),
        ]
        .iter()
        .map(|(n, v)| (n.to_string(), v.to_string()))
        .collect();
        assert_eq!(params, expected);
    }

    #[test]
    fn unknown_controls_and_options_are_navigation_errors() {
        let mut form = parse_forms(PAGE, &page_url()).unwrap().remove(0);

        assert!(matches!(
            form.select("subject", "CS"),
            Err(NavigationError::ControlNotFound(name)) if name == "subject"
        ));
        assert!(matches!(
            form.select("subj_code", "NOPE"),
            Err(NavigationError::OptionNotFound { value, .. }) if value == "NOPE"
        ));
        assert!(matches!(
            form.submission("GO"),
            Err(NavigationError::ControlNotFound(_))
        ));
    }

    #[test]
    fn form_without_action_posts_back_to_the_page() {
        let html = r#"<form><select name="s"><option>Only</option></select></form>"#;
        let form = parse_forms(html, &page_url()).unwrap().remove(0);

        assert_eq!(form.method, FormMethod::Get);
        assert_eq!(form.action, page_url());
        assert_eq!(
            form.controls,
            vec![Control::Select {
                name: "s".to_string(),
                value: Some("Only".to_string()),
                options: vec!["Only".to_string()],
            }]
        );
    }
}
