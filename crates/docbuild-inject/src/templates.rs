//! Templates for generated and injected configuration.

use minijinja::{Environment, Value};

/// Name of the bootstrap `conf.py` template.
pub const CONF_PY_BOOTSTRAP: &str = "conf.py.conf";

/// Name of the block appended to every `conf.py`.
pub const CONF_PY_INJECTED: &str = "conf.py.tmpl";

/// Name of the Mkdocs build data script template.
pub const MKDOCS_DATA_JS: &str = "data.js.tmpl";

/// First line of the injected `conf.py` block.
pub const INJECTED_BEGIN: &str = "# -- begin docbuild injected configuration --";

/// Last line of the injected `conf.py` block.
pub const INJECTED_END: &str = "# -- end docbuild injected configuration --";

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);

        env.add_filter("py_str", py_str);
        env.add_filter("py_escape", py_escape);

        env.add_template(CONF_PY_BOOTSTRAP, BOOTSTRAP_TEMPLATE)?;
        env.add_template(CONF_PY_INJECTED, INJECTED_TEMPLATE)?;
        env.add_template(MKDOCS_DATA_JS, DATA_JS_TEMPLATE)?;

        Ok(Self { env })
    }

    /// Render a template with any serializable context.
    pub fn render<S: serde::Serialize>(
        &self,
        template: &str,
        context: S,
    ) -> Result<String, minijinja::Error> {
        self.env
            .get_template(template)?
            .render(Value::from_serialize(&context))
    }
}

/// Escape a value for use inside a single-quoted Python string.
fn py_escape(value: Value) -> String {
    if value.is_undefined() || value.is_none() {
        return String::new();
    }
    let raw = value.to_string();
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_ascii_control() => escaped.push_str(&format!("\\x{:02x}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Render a value as a Python unicode string literal.
fn py_str(value: Value) -> String {
    format!("u'{}'", py_escape(value))
}

const BOOTSTRAP_TEMPLATE: &str = r#"# -*- coding: utf-8 -*-

from __future__ import division, print_function, unicode_literals

from datetime import datetime

from recommonmark.parser import CommonMarkParser

extensions = []
templates_path = ['{{ template_dir|py_escape }}', 'templates', '_templates', '.templates']
source_suffix = ['.rst', '.md']
source_parsers = {
            '.md': CommonMarkParser,
        }
master_doc = '{{ master_doc|py_escape }}'
project = {{ project_name|py_str }}
copyright = str(datetime.now().year)
version = '{{ version_name|py_escape }}'
release = '{{ version_name|py_escape }}'
exclude_patterns = ['_build']
pygments_style = 'sphinx'
htmlhelp_basename = '{{ project_slug|py_escape }}'
html_theme = 'sphinx_rtd_theme'
file_insertion_enabled = False
latex_documents = [
  ('{{ master_doc|py_escape }}', '{{ project_slug|py_escape }}.tex', u'{{ project_name|py_escape }} Documentation',
   u'{{ author|py_escape }}', 'manual'),
]
"#;

const INJECTED_TEMPLATE: &str = r#"# -- begin docbuild injected configuration --
#
# Added automatically for every hosted build. Changes to this block are
# replaced the next time the project is built.

import importlib
import os.path

from six import string_types

if globals().get('source_suffix', False):
    if isinstance(source_suffix, string_types):
        SUFFIX = source_suffix
    elif isinstance(source_suffix, (list, tuple)):
        SUFFIX = source_suffix[0]
    elif isinstance(source_suffix, dict):
        SUFFIX = list(source_suffix.keys())[0]
    else:
        SUFFIX = '.rst'
else:
    SUFFIX = '.rst'

# Appended last so platform files override earlier ones.
if 'html_static_path' not in globals():
    html_static_path = []
if os.path.exists('_static'):
    html_static_path.append('_static')
html_static_path.append('{{ static_path|py_escape }}')

if 'templates_path' not in globals():
    templates_path = []
templates_path.insert(0, '{{ template_path|py_escape }}')

using_rtd_theme = (
    (
        'html_theme' in globals() and
        html_theme in ['default'] and
        'html_style' not in globals()
    ) or 'html_theme' not in globals()
)
if using_rtd_theme:
    theme = importlib.import_module('{{ html_theme_import|default("sphinx_rtd_theme")|py_escape }}')
    html_theme = '{{ html_theme|default("sphinx_rtd_theme")|py_escape }}'
    html_style = None
    html_theme_options = {}
    if 'html_theme_path' in globals():
        html_theme_path.append(theme.get_html_theme_path())
    else:
        html_theme_path = [theme.get_html_theme_path()]

if globals().get('websupport2_base_url', False):
    websupport2_base_url = '{{ api_host|py_escape }}/websupport'
    websupport2_static_url = '{{ static_url|py_escape }}'

context = {
    'using_theme': using_rtd_theme,
    'html_theme': html_theme,
    'current_version': {{ current_version|py_str }},
    'version_slug': '{{ version_slug|py_escape }}',
    'MEDIA_URL': '{{ media_url|py_escape }}',
    'STATIC_URL': '{{ static_url|py_escape }}',
    'PRODUCTION_DOMAIN': '{{ production_domain|py_escape }}',
    'versions': [{% for v in versions %}
    ('{{ v.slug|py_escape }}', '{{ v.url|py_escape }}'),{% endfor %}
    ],
    'downloads': [{% if downloads %}{% for name, url in downloads|items %}
    ('{{ name|py_escape }}', '{{ url|py_escape }}'),{% endfor %}{% endif %}
    ],
    'slug': '{{ project_slug|py_escape }}',
    'name': {{ project_name|py_str }},
    'rtd_language': {{ language|py_str }},
    'programming_language': {{ programming_language|py_str }},
    'canonical_url': '{{ canonical_url|py_escape }}',
    'analytics_code': '{{ analytics_code|py_escape }}',
    'single_version': {% if single_version %}True{% else %}False{% endif %},
    'conf_py_path': '{{ conf_py_path|py_escape }}',
    'api_host': '{{ api_host|py_escape }}',
    'github_user': '{{ github_user|py_escape }}',
    'github_repo': '{{ github_repo|py_escape }}',
    'github_version': '{{ github_version|py_escape }}',
    'display_github': {% if display_github %}True{% else %}False{% endif %},
    'bitbucket_user': '{{ bitbucket_user|py_escape }}',
    'bitbucket_repo': '{{ bitbucket_repo|py_escape }}',
    'bitbucket_version': '{{ bitbucket_version|py_escape }}',
    'display_bitbucket': {% if display_bitbucket %}True{% else %}False{% endif %},
    'gitlab_user': '{{ gitlab_user|py_escape }}',
    'gitlab_repo': '{{ gitlab_repo|py_escape }}',
    'gitlab_version': '{{ gitlab_version|py_escape }}',
    'display_gitlab': {% if display_gitlab %}True{% else %}False{% endif %},
    'READTHEDOCS': True,
    'new_theme': (html_theme == 'sphinx_rtd_theme'),
    'source_suffix': SUFFIX,
    'ad_free': {% if ad_free %}True{% else %}False{% endif %},
    'user_analytics_code': '{{ analytics_code|py_escape }}',
    'global_analytics_code': '{{ global_analytics_code|py_escape }}',
    'commit': '{{ commit|py_escape }}',
}
if 'html_context' in globals():
    html_context.update(context)
else:
    html_context = context

# Must load first, other extensions can interfere with it.
if 'extensions' in globals():
    extensions.insert(0, 'readthedocs_ext.readthedocs')
else:
    extensions = ['readthedocs_ext.readthedocs']
# -- end docbuild injected configuration --
"#;

const DATA_JS_TEMPLATE: &str = "var READTHEDOCS_DATA = {{ data_json }};\n";
