use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::flow::flow_model::{Flow, Step, StepAction};
use crate::locator::escape::xpath_literal;
use crate::locator::locator_model::Locator;

use super::framework::{Framework, unsupported};

/// `tag:has-text("…")` as produced by the text-content rule
static HAS_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([a-zA-Z][a-zA-Z0-9-]*):has-text\("((?:[^"\\]|\\.)*)"\)$"#).unwrap()
});

static CSS_HEX_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{1,6} ?").unwrap());

// ============================================================================
// Locator targets
// ============================================================================

/// How a step's locator is addressed in generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Css(String),
    /// Element of `tag` whose text contains `text`
    Text { tag: String, text: String },
}

/// Split a locator into plain CSS or a text predicate.
///
/// Only Playwright understands `:has-text()` inside CSS; every other target
/// translates the `Text` form into its native text lookup.
pub fn parse_target(locator: &str) -> Target {
    match HAS_TEXT.captures(locator) {
        Some(caps) => Target::Text {
            tag: caps[1].to_ascii_lowercase(),
            text: unescape_css_string(&caps[2]),
        },
        None => Target::Css(locator.to_string()),
    }
}

fn unescape_css_string(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut rest = escaped;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 1..];
        if let Some(m) = CSS_HEX_ESCAPE.find(rest) {
            let hex = m.as_str().trim_end();
            if let Some(c) = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
                out.push(c);
            }
            rest = &rest[m.end()..];
        } else if let Some(c) = rest.chars().next() {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    out.push_str(rest);
    out
}

// ============================================================================
// String escaping for generated sources
// ============================================================================

/// Escape for a single-quoted JavaScript string literal.
pub fn js_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Escape for a double-quoted Java string literal.
pub fn java_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// `a|b` expectation split into alternatives, each matched literally.
fn alternation(expected: &str) -> Option<String> {
    if !expected.contains('|') {
        return None;
    }
    let options: Vec<String> = expected.split('|').map(regex::escape).collect();
    Some(options.join("|"))
}

/// Case-insensitive JavaScript regex literal for an alternation pattern.
fn js_regex(pattern: &str) -> String {
    format!("/{}/i", pattern.replace('/', "\\/"))
}

// ============================================================================
// Element expressions per framework
// ============================================================================

fn selenium_by(target: &Target) -> String {
    match target {
        Target::Css(css) => format!("By.cssSelector(\"{}\")", java_string(css)),
        Target::Text { tag, text } => format!(
            "By.xpath(\"{}\")",
            java_string(&format!(
                "//{}[contains(normalize-space(), {})]",
                tag,
                xpath_literal(text)
            ))
        ),
    }
}

fn selenium_element(target: &Target) -> String {
    format!("driver.findElement({})", selenium_by(target))
}

fn cypress_element(target: &Target) -> String {
    match target {
        Target::Css(css) => format!("cy.get('{}')", js_string(css)),
        Target::Text { tag, text } => {
            format!("cy.contains('{}', '{}')", js_string(tag), js_string(text))
        }
    }
}

fn wdio_element(target: &Target) -> String {
    match target {
        Target::Css(css) => format!("$('{}')", js_string(css)),
        Target::Text { tag, text } => format!("$('{}*={}')", js_string(tag), js_string(text)),
    }
}

fn testcafe_element(target: &Target) -> String {
    match target {
        Target::Css(css) => format!("Selector('{}')", js_string(css)),
        Target::Text { tag, text } => format!(
            "Selector('{}').withText('{}')",
            js_string(tag),
            js_string(text)
        ),
    }
}

// ============================================================================
// Step statements
// ============================================================================

/// Render one step as a single statement for `framework`.
pub fn emit_step(step: &Step, framework: Framework) -> String {
    match framework {
        Framework::Playwright => playwright_step(step),
        Framework::Selenium => selenium_step(step),
        Framework::Cypress => cypress_step(step),
        Framework::WebdriverIo => wdio_step(step),
        Framework::TestCafe => testcafe_step(step),
    }
}

fn value_of(step: &Step) -> &str {
    step.value.as_deref().unwrap_or_default()
}

fn expected_of(step: &Step) -> &str {
    step.expected.as_deref().unwrap_or_default()
}

fn playwright_step(step: &Step) -> String {
    let loc = js_string(&step.locator);
    match step.action {
        StepAction::Navigate => format!("await page.goto('{}');", loc),
        StepAction::Fill => format!("await page.fill('{}', '{}');", loc, js_string(value_of(step))),
        StepAction::Click => format!("await page.click('{}');", loc),
        StepAction::Select => format!(
            "await page.selectOption('{}', '{}');",
            loc,
            js_string(value_of(step))
        ),
        StepAction::Check => format!("await page.check('{}');", loc),
        StepAction::Assert => {
            let expected = expected_of(step);
            let matcher = match alternation(expected) {
                Some(pattern) => js_regex(&pattern),
                None => format!("'{}'", js_string(expected)),
            };
            format!("await expect(page.locator('{}')).toContainText({});", loc, matcher)
        }
    }
}

fn selenium_step(step: &Step) -> String {
    let el = selenium_element(&parse_target(&step.locator));
    match step.action {
        StepAction::Navigate => format!("driver.get(\"{}\");", java_string(&step.locator)),
        StepAction::Fill => format!("{}.sendKeys(\"{}\");", el, java_string(value_of(step))),
        StepAction::Click => format!("{}.click();", el),
        StepAction::Select => format!(
            "new Select({}).selectByVisibleText(\"{}\");",
            el,
            java_string(value_of(step))
        ),
        StepAction::Check => format!("if (!{el}.isSelected()) {{ {el}.click(); }}", el = el),
        StepAction::Assert => {
            let expected = expected_of(step);
            match alternation(expected) {
                Some(pattern) => format!(
                    "assertTrue(Pattern.compile(\"{}\", Pattern.CASE_INSENSITIVE).matcher({}.getText()).find());",
                    java_string(&pattern),
                    el
                ),
                None => format!(
                    "assertTrue({}.getText().contains(\"{}\"));",
                    el,
                    java_string(expected)
                ),
            }
        }
    }
}

fn cypress_step(step: &Step) -> String {
    let el = cypress_element(&parse_target(&step.locator));
    match step.action {
        StepAction::Navigate => format!("cy.visit('{}');", js_string(&step.locator)),
        StepAction::Fill => format!("{}.type('{}');", el, js_string(value_of(step))),
        StepAction::Click => format!("{}.click();", el),
        StepAction::Select => format!("{}.select('{}');", el, js_string(value_of(step))),
        StepAction::Check => format!("{}.check();", el),
        StepAction::Assert => {
            let expected = expected_of(step);
            match alternation(expected) {
                Some(pattern) => format!(
                    "{}.invoke('text').should('match', {});",
                    el,
                    js_regex(&pattern)
                ),
                None => format!("{}.should('contain', '{}');", el, js_string(expected)),
            }
        }
    }
}

fn wdio_step(step: &Step) -> String {
    let el = wdio_element(&parse_target(&step.locator));
    match step.action {
        StepAction::Navigate => format!("await browser.url('{}');", js_string(&step.locator)),
        StepAction::Fill => format!("await {}.setValue('{}');", el, js_string(value_of(step))),
        StepAction::Click | StepAction::Check => format!("await {}.click();", el),
        StepAction::Select => format!(
            "await {}.selectByVisibleText('{}');",
            el,
            js_string(value_of(step))
        ),
        StepAction::Assert => {
            let expected = expected_of(step);
            match alternation(expected) {
                Some(pattern) => format!("await expect({}).toHaveText({});", el, js_regex(&pattern)),
                None => format!(
                    "await expect({}).toHaveText(expect.stringContaining('{}'));",
                    el,
                    js_string(expected)
                ),
            }
        }
    }
}

fn testcafe_step(step: &Step) -> String {
    let el = testcafe_element(&parse_target(&step.locator));
    match step.action {
        StepAction::Navigate => format!("await t.navigateTo('{}');", js_string(&step.locator)),
        StepAction::Fill => format!("await t.typeText({}, '{}');", el, js_string(value_of(step))),
        StepAction::Click | StepAction::Check => format!("await t.click({});", el),
        StepAction::Select => format!(
            "await t.click({el}).click({el}.find('option').withText('{}'));",
            js_string(value_of(step)),
            el = el
        ),
        StepAction::Assert => {
            let expected = expected_of(step);
            match alternation(expected) {
                Some(pattern) => {
                    format!("await t.expect({}.innerText).match({});", el, js_regex(&pattern))
                }
                None => format!(
                    "await t.expect({}.innerText).contains('{}');",
                    el,
                    js_string(expected)
                ),
            }
        }
    }
}

// ============================================================================
// Test files
// ============================================================================

/// Render one flow as a test block (no file preamble).
pub fn emit_flow(flow: &Flow, framework: Framework) -> String {
    let title = js_string(&flow.title);
    let header = match framework {
        Framework::Playwright => format!("test('{}', async ({{ page }}) => {{", title),
        Framework::Cypress => format!("it('{}', () => {{", title),
        Framework::WebdriverIo => format!("it('{}', async () => {{", title),
        Framework::TestCafe => format!("test('{}', async t => {{", title),
        Framework::Selenium => {
            return java_test_method(&flow.title, &java_method_name(&flow.title), &flow.steps);
        }
    };

    let mut out = header;
    out.push('\n');
    for step in &flow.steps {
        out.push_str("  ");
        out.push_str(&emit_step(step, framework));
        out.push('\n');
    }
    out.push_str("});\n");
    out
}

/// Render a complete test file for `flows` discovered on `url`.
pub fn emit_flows(url: &str, flows: &[Flow], framework: Framework) -> String {
    if flows.is_empty() {
        return format!("// No flows detected for {}", url);
    }

    match framework {
        Framework::Playwright => {
            let mut out = String::from("import { test, expect } from '@playwright/test';\n\n");
            out.push_str(&join_blocks(flows, framework));
            out
        }
        Framework::Cypress | Framework::WebdriverIo => {
            let mut out = format!(
                "describe('Website Testing for {}', () => {{\n",
                js_string(url)
            );
            out.push_str(&indent(&join_blocks(flows, framework), 2));
            out.push_str("});\n");
            out
        }
        Framework::TestCafe => {
            let mut out = String::from("import { Selector } from 'testcafe';\n\n");
            out.push_str(&format!(
                "fixture('Website Testing for {}')\n  .page('{}');\n\n",
                js_string(url),
                js_string(url)
            ));
            out.push_str(&join_blocks(flows, framework));
            out
        }
        Framework::Selenium => selenium_file(url, flows),
    }
}

/// Like `emit_flows`, but resolves `target` by name.
///
/// Unsupported names yield a single explanatory comment.
pub fn emit_code(url: &str, flows: &[Flow], target: &str) -> String {
    match Framework::from_name(target) {
        Some(framework) => emit_flows(url, flows, framework),
        None => unsupported(target),
    }
}

fn join_blocks(flows: &[Flow], framework: Framework) -> String {
    flows
        .iter()
        .map(|flow| emit_flow(flow, framework))
        .collect::<Vec<_>>()
        .join("\n")
}

fn selenium_file(url: &str, flows: &[Flow]) -> String {
    let mut out = String::from(
        "import org.junit.jupiter.api.AfterEach;\n\
         import org.junit.jupiter.api.Test;\n\
         import org.openqa.selenium.By;\n\
         import org.openqa.selenium.WebDriver;\n\
         import org.openqa.selenium.chrome.ChromeDriver;\n\
         import org.openqa.selenium.support.ui.Select;\n\
         import java.util.regex.Pattern;\n\
         \n\
         import static org.junit.jupiter.api.Assertions.assertTrue;\n\
         \n",
    );
    out.push_str(&format!("// Website Testing for {}\n", url));
    out.push_str("public class WebsiteTest {\n");
    out.push_str("    private final WebDriver driver = new ChromeDriver();\n\n");
    out.push_str("    @AfterEach\n    public void tearDown() {\n        driver.quit();\n    }\n");

    let mut used = HashSet::new();
    for flow in flows {
        let base = java_method_name(&flow.title);
        let mut name = base.clone();
        let mut n = 2;
        while !used.insert(name.clone()) {
            name = format!("{}{}", base, n);
            n += 1;
        }
        out.push('\n');
        out.push_str(&indent(&java_test_method(&flow.title, &name, &flow.steps), 4));
    }
    out.push_str("}\n");
    out
}

fn java_test_method(title: &str, name: &str, steps: &[Step]) -> String {
    let mut out = format!("// {}\n@Test\npublic void {}() {{\n", title, name);
    for step in steps {
        out.push_str("    ");
        out.push_str(&emit_step(step, Framework::Selenium));
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

/// `"User Login Flow"` → `userLoginFlow`.
pub fn java_method_name(title: &str) -> String {
    let mut name = String::new();
    for (i, word) in title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                name.push(first.to_ascii_lowercase());
                name.push_str(&chars.as_str().to_ascii_lowercase());
            } else {
                name.push(first.to_ascii_uppercase());
                name.push_str(&chars.as_str().to_ascii_lowercase());
            }
        }
    }
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert_str(0, "flow");
    }
    name
}

fn indent(block: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    block
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        + "\n"
}

// ============================================================================
// Inspector snippet
// ============================================================================

/// Short snippet showing how to address one located element in `target`.
pub fn emit_locator(locator: &Locator, target: &str) -> String {
    let Some(framework) = Framework::from_name(target) else {
        return unsupported(target);
    };

    let css = parse_target(&locator.css_selector);
    let xpath = &locator.xpath;
    match framework {
        Framework::Playwright => format!(
            "// Playwright locators\n\
             await page.locator('{}').click();\n\
             // or using XPath\n\
             await page.locator('xpath={}').click();",
            js_string(&locator.css_selector),
            js_string(xpath)
        ),
        Framework::Selenium => format!(
            "// Selenium WebDriver (Java)\n\
             {}.click();\n\
             // or using XPath\n\
             driver.findElement(By.xpath(\"{}\")).click();",
            selenium_element(&css),
            java_string(xpath)
        ),
        Framework::Cypress => format!(
            "// Cypress\n\
             {}.click();\n\
             // Note: Cypress doesn't support XPath natively",
            cypress_element(&css)
        ),
        Framework::WebdriverIo => format!(
            "// WebdriverIO\n\
             await {}.click();\n\
             // or using XPath\n\
             await $('{}').click();",
            wdio_element(&css),
            js_string(xpath)
        ),
        Framework::TestCafe => format!(
            "// TestCafe\n\
             await t.click({});\n\
             // Note: TestCafe uses CSS selectors primarily",
            testcafe_element(&css)
        ),
    }
}
