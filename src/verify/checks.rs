//! Functional check catalogue
//!
//! Each check exercises one well-known package beyond a plain import. A
//! check runs only when its package appears in the manifest. Snippets store
//! their answer in a variable named `result`.

use crate::domain::VerificationProfile;
use std::time::Duration;

/// How a snippet's `result` is judged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// `str(result)` must equal this text exactly
    Exact(&'static str),
    /// `result` is JSON text that must equal this JSON document
    Json(&'static str),
    /// Completing without an exception is enough; `result` is reported
    Completes,
}

/// What a check runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckAction {
    /// Snippet executed in the probe backend
    Snippet {
        code: &'static str,
        expect: Expectation,
    },
    /// `python -m <module> <args...>` in its own process
    ModuleCommand {
        module: &'static str,
        args: &'static [&'static str],
        timeout: Duration,
    },
}

/// A functional smoke test for one package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionalCheck {
    /// Canonical package name that enables this check
    pub package: &'static str,
    /// Short description shown in the report
    pub label: &'static str,
    /// What to run
    pub action: CheckAction,
    /// Advisory checks report a warning instead of failing the run
    pub advisory: bool,
}

impl FunctionalCheck {
    /// Subject label, e.g. `jinja2 (render template)`
    pub fn subject(&self) -> String {
        format!("{} ({})", self.package, self.label)
    }
}

const fn snippet(
    package: &'static str,
    label: &'static str,
    code: &'static str,
    expect: Expectation,
) -> FunctionalCheck {
    FunctionalCheck {
        package,
        label,
        action: CheckAction::Snippet { code, expect },
        advisory: false,
    }
}

const fn advisory(check: FunctionalCheck) -> FunctionalCheck {
    FunctionalCheck {
        advisory: true,
        ..check
    }
}

/// Checks run under every profile
pub static GENERIC_CHECKS: &[FunctionalCheck] = &[
    snippet(
        "pyyaml",
        "safe dump/load round trip",
        concat!(
            "import json\n",
            "import yaml\n",
            "data = {\"name\": \"probe\", \"values\": [1, 2, 3]}\n",
            "result = json.dumps(yaml.safe_load(yaml.safe_dump(data)))\n",
        ),
        Expectation::Json(r#"{"name": "probe", "values": [1, 2, 3]}"#),
    ),
    snippet(
        "jinja2",
        "render template",
        concat!(
            "import jinja2\n",
            "result = jinja2.Template(\"Hello {{ name }}!\").render(name=\"World\")\n",
        ),
        Expectation::Exact("Hello World!"),
    ),
    snippet(
        "jsonschema",
        "validate instance",
        concat!(
            "import jsonschema\n",
            "schema = {\"type\": \"object\", \"properties\": {\"name\": {\"type\": \"string\"}}, \"required\": [\"name\"]}\n",
            "jsonschema.validate({\"name\": \"probe\"}, schema)\n",
            "result = \"valid\"\n",
        ),
        Expectation::Exact("valid"),
    ),
    snippet(
        "flask",
        "create application",
        concat!("import flask\n", "result = flask.Flask(\"probe\").name\n"),
        Expectation::Exact("probe"),
    ),
    snippet(
        "click",
        "style and unstyle",
        concat!(
            "import click\n",
            "result = click.unstyle(click.style(\"probe\", fg=\"green\"))\n",
        ),
        Expectation::Exact("probe"),
    ),
    snippet(
        "packaging",
        "version ordering",
        concat!(
            "from packaging.version import Version\n",
            "result = Version(\"1.10.0\") > Version(\"1.9.2\")\n",
        ),
        Expectation::Exact("True"),
    ),
    snippet(
        "xmltodict",
        "parse document",
        concat!(
            "import json\n",
            "import xmltodict\n",
            "result = json.dumps(xmltodict.parse(\"<root><item>probe</item></root>\"))\n",
        ),
        Expectation::Json(r#"{"root": {"item": "probe"}}"#),
    ),
    snippet(
        "lxml",
        "parse XML",
        concat!(
            "from lxml import etree\n",
            "result = etree.fromstring(\"<root><item>probe</item></root>\").findtext(\"item\")\n",
        ),
        Expectation::Exact("probe"),
    ),
    snippet(
        "requests",
        "open session",
        concat!(
            "import requests\n",
            "session = requests.Session()\n",
            "session.close()\n",
            "result = type(session).__name__\n",
        ),
        Expectation::Exact("Session"),
    ),
];

const AZDEV_VERSION: FunctionalCheck = snippet(
    "azdev",
    "version attribute",
    concat!("import azdev\n", "result = azdev.__VERSION__\n"),
    Expectation::Completes,
);

/// Extra checks for the Azure CLI development environment
pub static AZDEV_CHECKS: &[FunctionalCheck] = &[
    AZDEV_VERSION,
    snippet(
        "azdev",
        "core modules",
        concat!(
            "import azdev.utilities\n",
            "import azdev.operations\n",
            "result = \"loaded\"\n",
        ),
        Expectation::Exact("loaded"),
    ),
    snippet(
        "azdev",
        "version conflicts",
        concat!(
            "from importlib.metadata import version\n",
            "import packaging.version\n",
            "import setuptools\n",
            "import click\n",
            "result = \"packaging {}, setuptools {}, click {}\".format(\n",
            "    version(\"packaging\"), version(\"setuptools\"), version(\"click\"))\n",
        ),
        Expectation::Completes,
    ),
];

/// Extra checks for the AAZ code generation toolchain
pub static AAZ_DEV_CHECKS: &[FunctionalCheck] = &[
    AZDEV_VERSION,
    advisory(snippet(
        "aaz-dev-tools",
        "cli module",
        concat!("import aaz_dev.cli\n", "result = aaz_dev.cli.__name__\n"),
        Expectation::Completes,
    )),
    advisory(snippet(
        "aaz-dev-tools",
        "command module",
        concat!("import aaz_dev.command\n", "result = aaz_dev.command.__name__\n"),
        Expectation::Completes,
    )),
    advisory(snippet(
        "aaz-dev-tools",
        "utils module",
        concat!("import aaz_dev.utils\n", "result = aaz_dev.utils.__name__\n"),
        Expectation::Completes,
    )),
    advisory(snippet(
        "azdev",
        "operations module",
        concat!("import azdev.operations\n", "result = azdev.operations.__name__\n"),
        Expectation::Completes,
    )),
    FunctionalCheck {
        package: "azdev",
        label: "command help",
        action: CheckAction::ModuleCommand {
            module: "azdev",
            args: &["--help"],
            timeout: Duration::from_secs(30),
        },
        advisory: true,
    },
    snippet(
        "flask",
        "toolchain compatibility",
        concat!(
            "from importlib.metadata import version\n",
            "import click\n",
            "import flask\n",
            "import jinja2\n",
            "import jsonschema\n",
            "import packaging\n",
            "result = \"flask {}, jinja2 {}, click {}\".format(\n",
            "    version(\"flask\"), version(\"jinja2\"), version(\"click\"))\n",
        ),
        Expectation::Completes,
    ),
];

/// Every check active under a profile, in catalogue order
pub fn checks_for(profile: VerificationProfile) -> impl Iterator<Item = &'static FunctionalCheck> {
    let extra: &'static [FunctionalCheck] = match profile {
        VerificationProfile::Generic => &[],
        VerificationProfile::Azdev => AZDEV_CHECKS,
        VerificationProfile::AazDev => AAZ_DEV_CHECKS,
    };
    GENERIC_CHECKS.iter().chain(extra.iter())
}
