//! The locator: find-or-create access to singletons and the per-frame dispatch.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::dispatch::{dispatch_pass, FrameReport, Pass, PassReport};
use crate::{
    Behaviour, Container, EngineBound, ObjectCore, ObjectHost, RegistrationKind, SceneHost,
    Scope, Singleton, ToolboxConfig, ToolboxError, ToolboxEvent,
};

/// Global access point to singletons, and owner of the two-pass frame dispatch.
///
/// The toolbox is itself a [`Behaviour`], but a detached one: registering it is a
/// no-op, so it never shows up in the instance registry it dispatches.
///
/// # Examples
///
/// ```
/// use frame_toolbox::{Behaviour, EngineBound, ObjectCore, Scope, Singleton, Toolbox};
/// use std::sync::Arc;
///
/// struct Score {
///     core: ObjectCore,
/// }
///
/// impl Behaviour for Score {
///     fn core(&self) -> &ObjectCore {
///         &self.core
///     }
/// }
///
/// impl EngineBound for Score {}
///
/// impl Singleton for Score {
///     fn create(core: ObjectCore) -> anyhow::Result<Self> {
///         Ok(Score { core })
///     }
/// }
///
/// let toolbox = Toolbox::new(Arc::new(Scope::new()));
/// let a = toolbox.get::<Score>().unwrap();
/// let b = toolbox.get::<Score>().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
///
/// let frame = toolbox.on_update();
/// assert_eq!(frame.singletons.visited, 1);
/// ```
pub struct Toolbox {
    core: ObjectCore,
    scope: Arc<Scope>,
    config: ToolboxConfig,
    host: Box<dyn ObjectHost>,
    root: Mutex<Option<Arc<Container>>>,
}

impl Toolbox {
    pub fn new(scope: Arc<Scope>) -> Self {
        Self::with_config(scope, ToolboxConfig::default())
    }

    pub fn with_config(scope: Arc<Scope>, config: ToolboxConfig) -> Self {
        Self::with_host(scope, config, SceneHost::new())
    }

    pub fn with_host(
        scope: Arc<Scope>,
        config: ToolboxConfig,
        host: impl ObjectHost + 'static,
    ) -> Self {
        Self {
            core: ObjectCore::engine_bound::<Self>(RegistrationKind::Detached),
            scope,
            config,
            host: Box::new(host),
            root: Mutex::new(None),
        }
    }

    pub fn scope(&self) -> &Arc<Scope> {
        &self.scope
    }

    pub fn config(&self) -> &ToolboxConfig {
        &self.config
    }

    /// The root container, once a singleton has been created.
    pub fn root(&self) -> Option<Arc<Container>> {
        self.root.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Returns the live singleton of type `T` without creating one.
    pub fn find<T: Singleton>(&self) -> Option<Arc<T>> {
        let found = match self.scope.singletons().get::<T>() {
            Ok(found) => found,
            Err(err) => {
                self.error(&err.to_string());
                None
            }
        };

        self.scope.emit(&ToolboxEvent::Lookup {
            type_name: std::any::type_name::<T>(),
            found: found.is_some(),
        });
        found
    }

    /// Returns the singleton of type `T`, creating it on first use.
    ///
    /// A new instance is parented under the root container (created once, on
    /// demand) and then woken up, which registers it. Creation faults are logged
    /// and yield `None`.
    pub fn get<T: Singleton>(&self) -> Option<Arc<T>> {
        if let Some(found) = self.find::<T>() {
            return Some(found);
        }

        let created = self.create::<T>();
        self.scope.emit(&ToolboxEvent::Create {
            type_name: std::any::type_name::<T>(),
            created: created.is_ok(),
        });

        match created {
            Ok(instance) => Some(instance),
            Err(err) => {
                self.error(&err.to_string());
                None
            }
        }
    }

    fn create<T: Singleton>(&self) -> Result<Arc<T>, ToolboxError> {
        let root = self.root_container()?;

        let core = ObjectCore::engine_bound::<T>(RegistrationKind::Singleton);
        let instance = T::create(core)
            .map(Arc::new)
            .map_err(|source| ToolboxError::CreateFailed {
                type_name: std::any::type_name::<T>(),
                source,
            })?;

        root.attach(instance.clone());
        instance.awake(&self.scope);
        let recorded = matches!(
            self.scope.singletons().get::<T>(),
            Ok(Some(ref current)) if Arc::ptr_eq(current, &instance)
        );
        if !recorded {
            self.scope.instances().unregister(&instance);
            root.detach(&instance);
            return Err(ToolboxError::CreateFailed {
                type_name: std::any::type_name::<T>(),
                source: anyhow::anyhow!("instance was not recorded as the singleton on awake"),
            });
        }
        debug!(
            target: "frame_toolbox",
            "{} parented under {}",
            instance.identity(),
            root.name()
        );
        Ok(instance)
    }

    /// Finds the root container through the host, creating it if the host has none.
    fn root_container(&self) -> Result<Arc<Container>, ToolboxError> {
        let mut root = self.root.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(container) = root.as_ref() {
            return Ok(container.clone());
        }

        let name = self.config.root_container.as_str();
        let (container, created) = match self.host.find_container(name) {
            Some(existing) => (existing, false),
            None => {
                let created = self
                    .host
                    .create_container(name)
                    .map_err(ToolboxError::HostFailure)?;
                (created, true)
            }
        };

        *root = Some(container.clone());
        drop(root);

        // The callback may call back into the toolbox.
        if created {
            self.scope.emit(&ToolboxEvent::RootCreated {
                name: name.to_string(),
            });
        }
        Ok(container)
    }

    /// Runs one frame: every singleton, then every registry entry.
    ///
    /// A failing update hook ends its own pass for this frame only. The fault is
    /// logged once through [`Behaviour::error`] and reported in the returned
    /// [`FrameReport`]; the instance pass runs even if the singleton pass failed.
    pub fn on_update(&self) -> FrameReport {
        let singletons = self.run_pass(Pass::Singletons);
        let instances = self.run_pass(Pass::Instances);
        FrameReport {
            singletons,
            instances,
        }
    }

    fn run_pass(&self, pass: Pass) -> PassReport {
        let handles = match pass {
            Pass::Singletons => self.scope.singletons().handles(),
            Pass::Instances => self.scope.instances().handles(),
        };

        let report = dispatch_pass(pass, handles, self.config.trace_updates);
        if let Some(fault) = &report.fault {
            self.error(&format!("{pass} pass aborted: {fault}"));
            if let ToolboxError::UpdateFailed { object, .. } = fault {
                self.scope.emit(&ToolboxEvent::DispatchFault {
                    pass,
                    object: object.clone(),
                });
            }
        }
        report
    }
}

impl Behaviour for Toolbox {
    fn core(&self) -> &ObjectCore {
        &self.core
    }

    /// The host's per-frame callback.
    fn game_update(&self) -> anyhow::Result<()> {
        self.on_update();
        Ok(())
    }
}

impl EngineBound for Toolbox {}
