//! The plugin registry and capability extension.
//!
//! A plugin declares a name, optional version, and dependency names,
//! plus an install function. Installation is topological: every plugin
//! installs at most once, dependencies install first, unknown
//! dependencies fail with `MissingDependency` and dependency cycles
//! with `CircularDependency`.
//!
//! Because instants are plain values, capability extension works
//! through a registry of named operations rather than monkey-patching:
//! an installed plugin can register instance operations (dispatched by
//! name over an `&Instant`), static operations, locale data, and
//! formatter token extensions.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::{
    components::{Duration, Instant},
    error::KairosError,
    fmt::{Formatter, TokenFn},
    locale::Locale,
    KairosResult,
};

/// A loosely-typed value crossing the plugin boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum PluginValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Instant(Instant),
    Duration(Duration),
}

/// An operation bound to an instant, dispatched by name.
pub type InstanceFn = Arc<dyn Fn(&Instant, &[PluginValue]) -> KairosResult<PluginValue> + Send + Sync>;
/// A static operation on the entry point.
pub type StaticFn = Arc<dyn Fn(&[PluginValue]) -> KairosResult<PluginValue> + Send + Sync>;
/// An extra parse strategy, consulted after the built-in chain rejects
/// an input. Returns `None` to pass.
pub type ParserFn = Arc<dyn Fn(&str) -> Option<Instant> + Send + Sync>;
/// The installation hook.
pub type InstallFn = Arc<dyn Fn(&mut PluginHost<'_>) -> KairosResult<()> + Send + Sync>;

/// A plugin definition.
#[derive(Clone)]
pub struct Plugin {
    pub name: String,
    pub version: Option<String>,
    pub dependencies: Vec<String>,
    pub install: InstallFn,
}

impl core::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

impl Plugin {
    pub fn new(
        name: impl Into<String>,
        install: impl Fn(&mut PluginHost<'_>) -> KairosResult<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            version: None,
            dependencies: Vec::new(),
            install: Arc::new(install),
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }
}

/// What an installing plugin sees: registration surfaces for every
/// capability class.
pub struct PluginHost<'a> {
    registry: &'a mut PluginRegistry,
    formatter: &'a mut Formatter,
}

impl PluginHost<'_> {
    /// Registers a named operation over instants.
    pub fn register_instance_fn(&mut self, name: impl Into<String>, operation: InstanceFn) {
        self.registry.instance_fns.insert(name.into(), operation);
    }

    /// Registers a named static operation.
    pub fn register_static_fn(&mut self, name: impl Into<String>, operation: StaticFn) {
        self.registry.static_fns.insert(name.into(), operation);
    }

    /// Registers locale data through the process-wide store.
    pub fn register_locale(&mut self, locale: Locale) -> KairosResult<()> {
        crate::locale::register(locale)
    }

    /// Registers a formatter token extension.
    pub fn register_format_token(
        &mut self,
        token: impl Into<String>,
        producer: TokenFn,
    ) -> KairosResult<()> {
        self.formatter.register_token(token, producer)
    }

    /// Registers an extra parse strategy, consulted in registration
    /// order after the built-in chain rejects an input.
    pub fn register_parser(&mut self, parser: ParserFn) {
        self.registry.parsers.push(parser);
    }
}

#[derive(Debug, Clone)]
struct InstalledPlugin {
    version: Option<String>,
    dependencies: Vec<String>,
}

/// The registry: installed plugins plus their contributed operations.
#[derive(Default)]
pub struct PluginRegistry {
    installed: FxHashMap<String, InstalledPlugin>,
    instance_fns: FxHashMap<String, InstanceFn>,
    static_fns: FxHashMap<String, StaticFn>,
    parsers: Vec<ParserFn>,
}

impl core::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("installed", &self.installed.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, PartialEq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

impl PluginRegistry {
    /// Installs a batch of plugins in dependency order.
    ///
    /// Dependencies must already be installed or appear in the batch.
    /// A plugin that is already installed is skipped with a warning.
    pub(crate) fn install(
        &mut self,
        formatter: &mut Formatter,
        plugins: Vec<Plugin>,
    ) -> KairosResult<()> {
        let mut index: FxHashMap<String, usize> = FxHashMap::default();
        for (position, plugin) in plugins.iter().enumerate() {
            if plugin.name.is_empty() {
                return Err(
                    KairosError::configuration().with_message("plugin name cannot be empty.")
                );
            }
            index.insert(plugin.name.clone(), position);
        }
        let mut states = vec![VisitState::Unvisited; plugins.len()];
        for position in 0..plugins.len() {
            self.visit(position, &plugins, &index, &mut states, formatter)?;
        }
        Ok(())
    }

    fn visit(
        &mut self,
        position: usize,
        plugins: &[Plugin],
        index: &FxHashMap<String, usize>,
        states: &mut Vec<VisitState>,
        formatter: &mut Formatter,
    ) -> KairosResult<()> {
        let plugin = &plugins[position];
        match states[position] {
            VisitState::Done => return Ok(()),
            VisitState::InProgress => {
                return Err(KairosError::circular_dependency().with_message(format!(
                    "plugin dependency cycle through `{}`.",
                    plugin.name
                )))
            }
            VisitState::Unvisited => {}
        }
        if self.installed.contains_key(&plugin.name) {
            log::warn!("plugin `{}` is already installed; skipping", plugin.name);
            states[position] = VisitState::Done;
            return Ok(());
        }
        states[position] = VisitState::InProgress;
        for dependency in &plugin.dependencies {
            if self.installed.contains_key(dependency) {
                continue;
            }
            match index.get(dependency) {
                Some(&dependency_position) => {
                    self.visit(dependency_position, plugins, index, states, formatter)?;
                }
                None => {
                    return Err(KairosError::missing_dependency().with_message(format!(
                        "plugin `{}` requires `{dependency}`, which is not registered.",
                        plugin.name
                    )))
                }
            }
        }
        let mut host = PluginHost {
            registry: self,
            formatter,
        };
        (plugin.install)(&mut host)?;
        self.installed.insert(
            plugin.name.clone(),
            InstalledPlugin {
                version: plugin.version.clone(),
                dependencies: plugin.dependencies.clone(),
            },
        );
        states[position] = VisitState::Done;
        Ok(())
    }

    /// Returns whether a plugin is installed.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.installed.contains_key(name)
    }

    /// Returns an installed plugin's version.
    #[must_use]
    pub fn version(&self, name: &str) -> Option<&str> {
        self.installed.get(name)?.version.as_deref()
    }

    /// Returns an installed plugin's declared dependencies.
    #[must_use]
    pub fn dependencies(&self, name: &str) -> Option<&[String]> {
        self.installed
            .get(name)
            .map(|plugin| plugin.dependencies.as_slice())
    }

    /// Lists installed plugin names, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.installed.keys().cloned().collect();
        names.sort();
        names
    }

    /// Dispatches a registered instance operation.
    pub fn call_instance(
        &self,
        name: &str,
        instant: &Instant,
        args: &[PluginValue],
    ) -> KairosResult<PluginValue> {
        let operation = self.instance_fns.get(name).ok_or_else(|| {
            KairosError::missing_dependency()
                .with_message(format!("no instance operation `{name}` is registered."))
        })?;
        operation(instant, args)
    }

    /// Runs the registered extra parse strategies in order, returning
    /// the first valid result.
    #[must_use]
    pub fn try_parsers(&self, input: &str) -> Option<Instant> {
        self.parsers
            .iter()
            .find_map(|parser| parser(input).filter(Instant::is_valid))
    }

    /// Dispatches a registered static operation.
    pub fn call_static(&self, name: &str, args: &[PluginValue]) -> KairosResult<PluginValue> {
        let operation = self.static_fns.get(name).ok_or_else(|| {
            KairosError::missing_dependency()
                .with_message(format!("no static operation `{name}` is registered."))
        })?;
        operation(args)
    }
}

// ==== Plugin registry tests ====

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::{Plugin, PluginRegistry, PluginValue};
    use crate::error::ErrorKind;
    use crate::fmt::Formatter;

    #[test]
    fn install_order_respects_dependencies() {
        let mut registry = PluginRegistry::default();
        let mut formatter = Formatter::new();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        let tracker = |name: &'static str, order: &Arc<std::sync::Mutex<Vec<&'static str>>>| {
            let order = Arc::clone(order);
            move |_: &mut super::PluginHost<'_>| {
                order.lock().unwrap().push(name);
                Ok(())
            }
        };

        // Listed out of order; the dependent must still install last.
        let plugins = vec![
            Plugin::new("charts", tracker("charts", &order))
                .with_dependencies(["weekday-math", "business"]),
            Plugin::new("business", tracker("business", &order))
                .with_dependencies(["weekday-math"]),
            Plugin::new("weekday-math", tracker("weekday-math", &order)).with_version("1.2.0"),
        ];
        registry.install(&mut formatter, plugins).unwrap();
        assert_eq!(
            *order.lock().unwrap(),
            vec!["weekday-math", "business", "charts"]
        );
        assert!(registry.has("charts"));
        assert_eq!(registry.version("weekday-math"), Some("1.2.0"));
        assert_eq!(
            registry.list(),
            vec!["business", "charts", "weekday-math"]
        );
    }

    #[test]
    fn duplicate_installation_is_skipped() {
        let mut registry = PluginRegistry::default();
        let mut formatter = Formatter::new();
        let count = Arc::new(AtomicUsize::new(0));
        let make = |count: &Arc<AtomicUsize>| {
            let count = Arc::clone(count);
            Plugin::new("once", move |_: &mut super::PluginHost<'_>| {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        };
        registry.install(&mut formatter, vec![make(&count)]).unwrap();
        registry.install(&mut formatter, vec![make(&count)]).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_dependency_fails() {
        let mut registry = PluginRegistry::default();
        let mut formatter = Formatter::new();
        let plugin =
            Plugin::new("lonely", |_: &mut super::PluginHost<'_>| Ok(())).with_dependencies(["ghost"]);
        let err = registry.install(&mut formatter, vec![plugin]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingDependency);
        assert!(!registry.has("lonely"));
    }

    #[test]
    fn dependency_cycles_fail() {
        let mut registry = PluginRegistry::default();
        let mut formatter = Formatter::new();
        let plugins = vec![
            Plugin::new("a", |_: &mut super::PluginHost<'_>| Ok(())).with_dependencies(["b"]),
            Plugin::new("b", |_: &mut super::PluginHost<'_>| Ok(())).with_dependencies(["a"]),
        ];
        let err = registry.install(&mut formatter, plugins).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CircularDependency);
    }

    #[test]
    fn registered_operations_dispatch() {
        let mut registry = PluginRegistry::default();
        let mut formatter = Formatter::new();
        let plugin = Plugin::new("ops", |host: &mut super::PluginHost<'_>| {
            host.register_instance_fn(
                "isWeekend",
                Arc::new(|instant, _| {
                    Ok(PluginValue::Bool(matches!(instant.weekday(), Some(0 | 6))))
                }),
            );
            host.register_static_fn(
                "answer",
                Arc::new(|_| Ok(PluginValue::Int(42))),
            );
            Ok(())
        });
        registry.install(&mut formatter, vec![plugin]).unwrap();

        let saturday = crate::Instant::from_components(
            &crate::components::instant::DateTimeComponents {
                year: 2024,
                month: 6,
                day: 15,
                ..Default::default()
            },
            true,
        )
        .unwrap();
        let result = registry.call_instance("isWeekend", &saturday, &[]).unwrap();
        assert_eq!(result, PluginValue::Bool(true));
        assert_eq!(
            registry.call_static("answer", &[]).unwrap(),
            PluginValue::Int(42)
        );
        assert_eq!(
            registry
                .call_instance("missing", &saturday, &[])
                .unwrap_err()
                .kind(),
            ErrorKind::MissingDependency
        );
    }
}
