//! Macro for declaring a process-wide toolbox.

/// Declares a module holding a lazily-built, process-wide [`Toolbox`](crate::Toolbox).
///
/// The generated module contains:
/// - the static toolbox (private), built on first use
/// - free functions delegating to it: `get`, `find`, `on_update`, `scope`,
///   `toolbox`, `set_trace_callback`, `clear_trace_callback`
///
/// An optional second argument is an expression producing the
/// [`ToolboxConfig`](crate::ToolboxConfig).
///
/// # Examples
///
/// ```rust
/// use frame_toolbox::{define_toolbox, Behaviour, EngineBound, ObjectCore, Singleton};
///
/// define_toolbox!(game);
///
/// struct Settings {
///     core: ObjectCore,
/// }
///
/// impl Behaviour for Settings {
///     fn core(&self) -> &ObjectCore {
///         &self.core
///     }
/// }
///
/// impl EngineBound for Settings {}
///
/// impl Singleton for Settings {
///     fn create(core: ObjectCore) -> anyhow::Result<Self> {
///         Ok(Settings { core })
///     }
/// }
///
/// let settings = game::get::<Settings>().unwrap();
/// assert!(game::find::<Settings>().is_some());
///
/// game::on_update();
/// # drop(settings);
/// ```
///
/// # Multiple toolboxes
///
/// Each invocation has its own scope:
///
/// ```rust
/// use frame_toolbox::define_toolbox;
///
/// define_toolbox!(menu);
/// define_toolbox!(level, frame_toolbox::ToolboxConfig {
///     root_container: "LevelManagers".into(),
///     ..Default::default()
/// });
///
/// assert!(menu::scope().instances().is_empty());
/// assert_eq!(level::toolbox().config().root_container, "LevelManagers");
/// ```
#[macro_export]
macro_rules! define_toolbox {
    ($name:ident) => {
        $crate::define_toolbox!($name, $crate::ToolboxConfig::default());
    };
    ($name:ident, $config:expr) => {
        pub mod $name {
            use std::sync::{Arc, LazyLock};

            // Built on first access (module-private)
            static TOOLBOX: LazyLock<$crate::Toolbox> = LazyLock::new(|| {
                $crate::Toolbox::with_config(Arc::new($crate::Scope::new()), $config)
            });

            /// The toolbox itself.
            pub fn toolbox() -> &'static $crate::Toolbox {
                &TOOLBOX
            }

            /// The toolbox's registration state.
            pub fn scope() -> &'static Arc<$crate::Scope> {
                TOOLBOX.scope()
            }

            /// Find or create the singleton of type `T`.
            pub fn get<T: $crate::Singleton>() -> Option<Arc<T>> {
                TOOLBOX.get::<T>()
            }

            /// Find the singleton of type `T` without creating it.
            pub fn find<T: $crate::Singleton>() -> Option<Arc<T>> {
                TOOLBOX.find::<T>()
            }

            /// Run one frame of dispatch.
            pub fn on_update() -> $crate::FrameReport {
                TOOLBOX.on_update()
            }

            /// Set a tracing callback for this toolbox's scope.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::ToolboxEvent) + Send + Sync + 'static,
            ) {
                TOOLBOX.scope().set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                TOOLBOX.scope().clear_trace_callback()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::{Behaviour, EngineBound, ObjectCore, Singleton};

    struct Fog {
        core: ObjectCore,
    }

    impl Behaviour for Fog {
        fn core(&self) -> &ObjectCore {
            &self.core
        }
    }

    impl EngineBound for Fog {}

    impl Singleton for Fog {
        fn create(core: ObjectCore) -> anyhow::Result<Self> {
            Ok(Fog { core })
        }
    }

    #[test]
    fn test_define_toolbox_macro() {
        define_toolbox!(test_box);

        let a = test_box::get::<Fog>().unwrap();
        let b = test_box::get::<Fog>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(test_box::scope().singletons().contains::<Fog>());

        let frame = test_box::on_update();
        assert_eq!(frame.singletons.visited, 1);
    }

    #[test]
    fn test_multiple_toolboxes() {
        define_toolbox!(box_a);
        define_toolbox!(box_b);

        box_a::get::<Fog>().unwrap();

        assert!(box_a::find::<Fog>().is_some());
        assert!(box_b::find::<Fog>().is_none());
    }

    #[test]
    fn test_tracing() {
        define_toolbox!(trace_box);

        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();

        trace_box::set_trace_callback(move |event| {
            events_clone.lock().unwrap().push(format!("{}", event));
        });

        trace_box::get::<Fog>().unwrap();
        trace_box::clear_trace_callback();
        trace_box::get::<Fog>().unwrap();

        let recorded = events.lock().unwrap();
        assert_eq!(recorded.len(), 4);
        assert!(recorded[0].starts_with("lookup"));
        assert!(recorded[1].starts_with("root created"));
        assert!(recorded[2].starts_with("register"));
        assert!(recorded[3].starts_with("create"));
    }
}
