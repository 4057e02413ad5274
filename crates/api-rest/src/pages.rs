//! HTML rendering for the routed pages.
//!
//! Pages are small enough that plain `format!` templates are used; every user-supplied value
//! goes through [`escape_html`] first.

use ecg_core::constants::{DIAGNOSE_LABEL, DIAGNOSING_LABEL, DIAGNOSIS_FAILED_MESSAGE};
use ecg_core::{ContactForm, DiagnosisDraft, Gender, Route};

/// Values echoed back into the diagnosis form after a rejected submission.
#[derive(Clone, Debug, Default)]
pub struct ServicesValues {
    pub name: String,
    pub age: String,
    pub gender: Option<Gender>,
}

impl From<&DiagnosisDraft> for ServicesValues {
    fn from(draft: &DiagnosisDraft) -> Self {
        Self {
            name: draft.name.as_ref().map(|n| n.to_string()).unwrap_or_default(),
            age: draft.age.as_ref().map(|a| a.to_string()).unwrap_or_default(),
            gender: draft.gender,
        }
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn navbar(active: Option<Route>) -> String {
    let links: String = Route::ALL
        .iter()
        .map(|route| {
            let current = if Some(*route) == active {
                r#" aria-current="page""#
            } else {
                ""
            };
            format!(
                r#"<a href="{}"{}>{}</a>"#,
                route.path(),
                current,
                route.label()
            )
        })
        .collect::<Vec<_>>()
        .join(" ");

    format!(r#"<nav class="navbar"><div class="brand">ECG Diagnosis</div><div class="links">{links}</div></nav>"#)
}

/// Inline script raising the blocking message as a browser alert.
fn alert_script(message: Option<&str>) -> String {
    match message {
        Some(message) => {
            let literal = serde_json::to_string(message)
                .unwrap_or_else(|_| "\"\"".into())
                .replace("</", "<\\/");
            format!("<script>alert({literal});</script>")
        }
        None => String::new(),
    }
}

fn layout(title: &str, active: Option<Route>, body: &str, message: Option<&str>) -> String {
    let banner = message
        .map(|m| format!(r#"<p class="message" role="alert">{}</p>"#, escape_html(m)))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | ECG Diagnosis</title>
</head>
<body>
{nav}
<main>
{banner}
{body}
</main>
{alert}
</body>
</html>
"#,
        title = escape_html(title),
        nav = navbar(active),
        banner = banner,
        body = body,
        alert = alert_script(message),
    )
}

fn call_to_action(route: Route) -> String {
    route
        .call_to_action()
        .map(|cta| {
            format!(
                r#"<a class="button" href="{}">{}</a>"#,
                cta.target.path(),
                cta.label
            )
        })
        .unwrap_or_default()
}

pub fn home() -> String {
    let body = format!(
        r#"<section class="hero">
<p>Detection of cardiovascular disease using ECG Image</p>
<h1>Cardiovascular<br>disease</h1>
<p>AI to detect disease from ECG</p>
{}
</section>"#,
        call_to_action(Route::Home)
    );
    layout("Home", Some(Route::Home), &body, None)
}

pub fn about() -> String {
    let body = format!(
        r#"<section>
<h2>Transforming heart health</h2>
<h3>AI-powered ECG diagnosis</h3>
<p>Our mission is to revolutionize cardiovascular disease diagnosis using cutting-edge AI technology.
By analyzing ECG images, we provide accurate predictions of potential heart conditions, empowering
individuals to take proactive steps towards their health. Located in Chennai, we strive to deliver
precise, timely, and reliable insights into cardiovascular health, making heart care accessible to everyone.</p>
{}
</section>"#,
        call_to_action(Route::About)
    );
    layout("About", Some(Route::About), &body, None)
}

pub fn how_it_works() -> String {
    let body = r#"<section>
<h2>How it works</h2>
<ol>
<li>Open <a href="/services">Services</a> and enter the patient's name, age and gender.</li>
<li>Upload a photo or scan of the ECG printout.</li>
<li>Press <strong>Diagnose</strong>. The image is analysed by the prediction service.</li>
<li>A PDF report named after the patient is downloaded when the analysis finishes.</li>
</ol>
<p>Reports are generated with AI-assisted tools. Please consult a licensed cardiologist for
interpretation and clinical decisions.</p>
</section>"#;
    layout("How It Works", Some(Route::HowItWorks), body, None)
}

// Submits with fetch so the page stays interactive, downloads the PDF through a short-lived
// object URL, and revokes that URL as soon as the download has been triggered.
const SERVICES_SCRIPT: &str = r#"<script>
document.getElementById("diagnosis-form").addEventListener("submit", async (event) => {
  event.preventDefault();
  const form = event.target;
  const button = form.querySelector("button");
  if (button.disabled) return;
  button.disabled = true;
  button.textContent = "__BUSY__";
  try {
    const res = await fetch(form.action, { method: "POST", body: new FormData(form) });
    if (!res.ok) {
      alert(res.headers.get("x-ecg-message") || "__FAILED__");
      return;
    }
    const blob = new Blob([await res.arrayBuffer()], { type: "application/pdf" });
    const disposition = res.headers.get("content-disposition") || "";
    const encoded = /filename\*=UTF-8''([^;]+)/i.exec(disposition);
    const plain = /filename="([^"]+)"/.exec(disposition);
    const filename = encoded ? decodeURIComponent(encoded[1]) : plain ? plain[1] : "ECG_Report.pdf";
    const url = URL.createObjectURL(blob);
    try {
      const link = document.createElement("a");
      link.href = url;
      link.download = filename;
      document.body.appendChild(link);
      link.click();
      link.remove();
    } finally {
      setTimeout(() => URL.revokeObjectURL(url), 0);
    }
  } catch (error) {
    console.error("Diagnosis failed:", error);
    alert("__FAILED__");
  } finally {
    button.disabled = false;
    button.textContent = "__IDLE__";
  }
});
</script>"#;

pub fn services(values: &ServicesValues, message: Option<&str>) -> String {
    let options: String = std::iter::once(r#"<option value="">Select Gender</option>"#.to_string())
        .chain(Gender::ALL.iter().map(|g| {
            let selected = if values.gender == Some(*g) { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                g.as_str(),
                selected,
                g.label()
            )
        }))
        .collect();

    let script = SERVICES_SCRIPT
        .replace("__BUSY__", DIAGNOSING_LABEL)
        .replace("__IDLE__", DIAGNOSE_LABEL)
        .replace("__FAILED__", DIAGNOSIS_FAILED_MESSAGE);

    let body = format!(
        r#"<section>
<h2>ECG Diagnosis Service</h2>
<form id="diagnosis-form" method="post" action="/services" enctype="multipart/form-data">
<input type="text" name="name" placeholder="Full Name" value="{name}">
<input type="number" name="age" placeholder="Age" value="{age}">
<select name="gender">{options}</select>
<input type="file" name="image" accept="image/*">
<button type="submit">{label}</button>
</form>
</section>
{script}"#,
        name = escape_html(&values.name),
        age = escape_html(&values.age),
        options = options,
        label = DIAGNOSE_LABEL,
        script = script,
    );
    layout("Services", Some(Route::Services), &body, message)
}

pub fn contact(values: &ContactForm, message: Option<&str>) -> String {
    let checked = if values.consent { " checked" } else { "" };
    let body = format!(
        r#"<section class="contact">
<div>
<h1>Get in touch</h1>
<p>We're here to help you!</p>
<form method="post" action="/contact">
<label for="name">Name *</label>
<input type="text" id="name" name="name" required placeholder="Dr.P.Dhanalakshmi" value="{name}">
<label for="email">Email address *</label>
<input type="email" id="email" name="email" required placeholder="email@website.com" value="{email}">
<label for="phone">Phone number *</label>
<input type="tel" id="phone" name="phone" required placeholder="555-555-5555" value="{phone}">
<label for="message">Message</label>
<textarea id="message" name="message" rows="4">{text}</textarea>
<input type="checkbox" id="consent" name="consent"{checked}>
<label for="consent">I allow this website to store my submission so they can respond to my inquiry. *</label>
<button type="submit">SUBMIT</button>
</form>
</div>
<div>
<h3>Email</h3>
<p><a href="mailto:luffyboasanji1999@gmail.com">luffyboasanji1999@gmail.com</a></p>
<h3>Location</h3>
<p>Chennai, TN, India</p>
<h3>Hours</h3>
<p>Monday – Sunday<br>9:00am – 10:00pm</p>
</div>
</section>"#,
        name = escape_html(&values.name),
        email = escape_html(&values.email),
        phone = escape_html(&values.phone),
        text = escape_html(&values.message),
        checked = checked,
    );
    layout("Contact", Some(Route::Contact), &body, message)
}

pub fn not_found(path: &str) -> String {
    let body = format!(
        r#"<section><h2>Page not found</h2><p>No page at <code>{}</code>. <a href="/">Back to Home</a></p></section>"#,
        escape_html(path)
    );
    layout("Not Found", None, &body, None)
}

pub fn render(route: Route) -> String {
    match route {
        Route::Home => home(),
        Route::About => about(),
        Route::Services => services(&ServicesValues::default(), None),
        Route::HowItWorks => how_it_works(),
        Route::Contact => contact(&ContactForm::default(), None),
    }
}
