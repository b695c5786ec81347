//! JSI side of each module: the `Cxx<Module>Module` TurboModule class and the
//! `Bridging<T>` specializations that move values between `jsi::Value` and bridge types.

use indoc::formatdoc;

use super::shapes::{Shape, bridge_shapes};
use super::RegistrationRecord;
use crate::bind::{BoundEnum, BoundMethod, BoundModule, BoundRecord, BoundSignal};
use crate::codegen::render::nullable_name;
use crate::codegen::{CodegenContext, GeneratedFile, ModuleUnit, indent};
use crate::ir::EnumValue;
use crate::types::TargetType;

/// C++ spelling of a bridge type.
pub(crate) fn cxx_type(ty: &TargetType, module: &BoundModule) -> String {
    let ns = module.names.bridge_namespace();
    match ty {
        TargetType::Number => "double".to_string(),
        TargetType::String => "rust::String".to_string(),
        TargetType::Boolean => "bool".to_string(),
        TargetType::Void | TargetType::Signal => "void".to_string(),
        TargetType::Array(inner) => format!("rust::Vec<{}>", cxx_type(inner, module)),
        TargetType::Nullable(_) => format!("{ns}::{}", nullable_name(ty)),
        TargetType::Promise(inner) => cxx_type(inner, module),
        TargetType::Record(name) => match module.record(name) {
            Some(r) => format!("{ns}::{}", r.name),
            None => format!("{ns}::{name}"),
        },
        TargetType::Enum(name) => match module.enum_type(name) {
            Some(e) => format!("{ns}::{}", e.name),
            None => format!("{ns}::{name}"),
        },
    }
}

pub(super) fn module_files(ctx: &CodegenContext, unit: &ModuleUnit) -> Vec<GeneratedFile> {
    let module = &unit.bound;
    let class = module.names.cxx_class();
    let header = ctx.header("//", unit.hash());
    let dir = ctx.layout.cpp_dir();
    vec![
        GeneratedFile::generated(
            dir.join(format!("{class}.hpp")),
            format!("{header}\n{}", module_header(module)),
        ),
        GeneratedFile::generated(
            dir.join(format!("{class}.cpp")),
            format!("{header}\n{}", module_source(module)),
        ),
    ]
}

fn method_decl(name: &str) -> String {
    formatdoc! {"
        static facebook::jsi::Value
        {name}(facebook::jsi::Runtime &rt,
            facebook::react::TurboModule &turboModule,
            const facebook::jsi::Value args[], size_t count);",
        name = name,
    }
}

pub(crate) fn module_header(module: &BoundModule) -> String {
    let names = &module.names;
    let class = names.cxx_class();

    let mut decls = Vec::new();
    if module.has_signals() {
        decls.push("void emit(std::string name);".to_string());
    }
    decls.extend(module.methods.iter().map(|m| method_decl(&m.cxx_name)));
    decls.extend(module.signals.iter().map(|s| method_decl(&s.cxx_name)));

    formatdoc! {"
        #pragma once

        #include \"CrabyUtils.hpp\"
        #include \"{bridge}.rs.h\"
        #include <ReactCommon/TurboModule.h>
        #include <atomic>
        #include <jsi/jsi.h>
        #include <memory>
        #include <mutex>
        #include <string>
        #include <unordered_map>

        namespace craby {{
        namespace {flat} {{

        class JSI_EXPORT {class} : public facebook::react::TurboModule {{
        public:
          static constexpr const char *kModuleName = \"{js}\";
          static std::string dataPath;

          {class}(std::shared_ptr<facebook::react::CallInvoker> jsInvoker);
          ~{class}();

          void invalidate();

        {decls}

        protected:
          std::shared_ptr<facebook::react::CallInvoker> callInvoker_;
          std::shared_ptr<{ns}::{pascal}> module_;
          std::atomic<bool> invalidated_{{false}};
          std::atomic<size_t> nextListenerId_{{0}};
          std::mutex listenersMutex_;
          std::unordered_map<
              std::string,
              std::unordered_map<size_t, std::shared_ptr<facebook::jsi::Function>>>
              listenersMap_;
          std::shared_ptr<craby::utils::ThreadPool> threadPool_;
        }};

        }} // namespace {flat}
        }} // namespace craby
        ",
        bridge = names.bridge_mod(),
        flat = names.flat,
        class = class,
        js = names.js,
        ns = names.bridge_namespace(),
        pascal = names.pascal,
        decls = indent(&decls.join("\n\n"), 2),
    }
}

pub(crate) fn module_source(module: &BoundModule) -> String {
    let names = &module.names;
    let class = names.cxx_class();
    let record = RegistrationRecord::new(module);

    let method_map = record
        .methods
        .iter()
        .map(|entry| {
            let cxx_name = module
                .methods
                .iter()
                .find(|m| m.js_name == entry.name)
                .map(|m| m.cxx_name.as_str())
                .or_else(|| {
                    module
                        .signals
                        .iter()
                        .find(|s| s.js_name == entry.name)
                        .map(|s| s.cxx_name.as_str())
                })
                .unwrap_or(entry.name.as_str());
            format!(
                "methodMap_[\"{}\"] = MethodMetadata{{{}, &{class}::{cxx_name}}};",
                entry.name, entry.arg_count
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut ctor = Vec::new();
    if record.capabilities.signals {
        ctor.push(formatdoc! {"
            uintptr_t id = reinterpret_cast<uintptr_t>(this);
            auto &manager = craby::signals::SignalManager::getInstance();
            manager.registerDelegate(id,
                                     std::bind(&{class}::emit,
                                               this,
                                               std::placeholders::_1));",
            class = class,
        });
    }
    ctor.push(formatdoc! {"
        callInvoker_ = std::move(jsInvoker);
        module_ = std::shared_ptr<{ns}::{pascal}>(
            {ns}::create{pascal}(reinterpret_cast<uintptr_t>(this), rust::Str(dataPath.data(), dataPath.size())).into_raw(),
            []({ns}::{pascal} *ptr) {{ rust::Box<{ns}::{pascal}>::from_raw(ptr); }});",
        ns = names.bridge_namespace(),
        pascal = names.pascal,
    });
    if record.capabilities.async_methods {
        ctor.push("threadPool_ = std::make_shared<craby::utils::ThreadPool>(10);".to_string());
    }
    ctor.push(method_map);

    let mut teardown = vec!["listenersMap_.clear();".to_string()];
    if record.capabilities.signals {
        teardown.push(formatdoc! {"
            uintptr_t id = reinterpret_cast<uintptr_t>(this);
            auto &manager = craby::signals::SignalManager::getInstance();
            manager.unregisterDelegate(id);"
        });
    }
    if record.capabilities.async_methods {
        teardown.push("threadPool_->shutdown();".to_string());
    }

    let mut bodies = Vec::new();
    if record.capabilities.signals {
        bodies.push(emit_body(&class));
    }
    bodies.extend(module.methods.iter().map(|m| method_body(module, m)));
    bodies.extend(module.signals.iter().map(|s| signal_body(&class, s)));

    formatdoc! {"
        #include \"{class}.hpp\"
        #include \"bridging-generated.hpp\"
        #include <react/bridging/Bridging.h>

        using namespace facebook;

        namespace craby {{
        namespace {flat} {{

        std::string {class}::dataPath;

        {class}::{class}(
            std::shared_ptr<react::CallInvoker> jsInvoker)
            : TurboModule({class}::kModuleName, jsInvoker) {{
        {ctor}
        }}

        {class}::~{class}() {{
          invalidate();
        }}

        void {class}::invalidate() {{
          if (invalidated_.exchange(true)) {{
            return;
          }}

        {teardown}
        }}

        {bodies}

        }} // namespace {flat}
        }} // namespace craby
        ",
        class = class,
        flat = names.flat,
        ctor = indent(&ctor.join("\n\n"), 2),
        teardown = indent(&teardown.join("\n"), 2),
        bodies = bodies.join("\n\n"),
    }
}

fn emit_body(class: &str) -> String {
    formatdoc! {"
        void {class}::emit(std::string name) {{
          std::vector<std::shared_ptr<jsi::Function>> listeners;
          {{
            std::lock_guard<std::mutex> lock(listenersMutex_);
            auto it = listenersMap_.find(name);
            if (it != listenersMap_.end()) {{
              for (auto &[_, listener] : it->second) {{
                listeners.push_back(listener);
              }}
            }}
          }}

          for (auto &listener : listeners) {{
            callInvoker_->invokeAsync([listener](jsi::Runtime &rt) {{
              listener->call(rt);
            }});
          }}
        }}",
        class = class,
    }
}

fn arg_noun(count: usize) -> &'static str {
    if count == 1 { "argument" } else { "arguments" }
}

fn method_prologue(class: &str, name: &str) -> String {
    formatdoc! {"
        jsi::Value {class}::{name}(jsi::Runtime &rt,
                                 react::TurboModule &turboModule,
                                 const jsi::Value args[],
                                 size_t count) {{
          auto &thisModule = static_cast<{class} &>(turboModule);
          auto callInvoker = thisModule.callInvoker_;
          auto it_ = thisModule.module_;
        ",
        class = class,
        name = name,
    }
}

const METHOD_EPILOGUE: &str = indoc::indoc! {"
      } catch (const jsi::JSError &err) {
        throw err;
      } catch (const std::exception &err) {
        throw jsi::JSError(rt, craby::utils::errorMessage(err));
      }
    }"};

pub(crate) fn method_body(module: &BoundModule, method: &BoundMethod) -> String {
    let names = &module.names;
    let class = names.cxx_class();
    let count = method.params.len();

    let mut lines = vec![formatdoc! {"
        if ({count} != count) {{
          throw jsi::JSError(rt, \"Expected {count} {noun}\");
        }}
        ",
        count = count,
        noun = arg_noun(count),
    }];
    for (i, param) in method.params.iter().enumerate() {
        lines.push(format!(
            "auto arg{i} = react::bridging::fromJs<{}>(rt, args[{i}], callInvoker);",
            cxx_type(&param.ty, module)
        ));
    }

    let args = std::iter::once("*it_".to_string())
        .chain((0..count).map(|i| format!("arg{i}")))
        .collect::<Vec<_>>()
        .join(", ");
    let call = format!("{}::{}({args})", names.bridge_namespace(), method.cxx_name);
    let settled = method.ret.settled();

    if method.is_async {
        let captures = std::iter::once("it_".to_string())
            .chain((0..count).map(|i| format!("arg{i}")))
            .collect::<Vec<_>>()
            .join(", ");
        let (run, resolve) = if settled.is_void() {
            (
                format!("{call};"),
                formatdoc! {"
                    callInvoker->invokeAsync([promise](jsi::Runtime &rt) {{
                      promise->resolve(jsi::Value::undefined());
                    }});"
                },
            )
        } else {
            (
                format!("auto ret = {call};"),
                formatdoc! {"
                    callInvoker->invokeAsync([promise, ret](jsi::Runtime &rt) {{
                      promise->resolve(react::bridging::toJs(rt, ret));
                    }});"
                },
            )
        };
        lines.push(formatdoc! {"

            return react::createPromiseAsJSIValue(
                rt,
                [{captures}, callInvoker, threadPool = thisModule.threadPool_](
                    jsi::Runtime &rt, std::shared_ptr<react::Promise> promise) {{
                  threadPool->enqueue([{captures}, callInvoker, promise]() {{
                    try {{
            {run}
            {resolve}
                    }} catch (const std::exception &err) {{
                      auto message = craby::utils::errorMessage(err);
                      callInvoker->invokeAsync([promise, message](jsi::Runtime &rt) {{
                        promise->reject(message);
                      }});
                    }}
                  }});
                }});",
            captures = captures,
            run = indent(&run, 10),
            resolve = indent(&resolve, 10),
        });
    } else if settled.is_void() {
        lines.push(format!("{call};\n\nreturn jsi::Value::undefined();"));
    } else {
        lines.push(format!(
            "auto ret = {call};\n\nreturn react::bridging::toJs(rt, ret);"
        ));
    }

    format!(
        "{}\n  try {{\n{}\n{METHOD_EPILOGUE}",
        method_prologue(&class, &method.cxx_name),
        indent(&lines.join("\n"), 4),
    )
}

/// Listener registration. Returns a cleanup function that removes the listener.
fn signal_body(class: &str, signal: &BoundSignal) -> String {
    let body = formatdoc! {"
        if (1 != count) {{
          throw jsi::JSError(rt, \"Expected 1 argument\");
        }}

        auto callback = args[0].asObject(rt).asFunction(rt);
        auto callbackRef = std::make_shared<jsi::Function>(std::move(callback));
        auto id = thisModule.nextListenerId_.fetch_add(1);
        std::string name = \"{js}\";

        {{
          std::lock_guard<std::mutex> lock(thisModule.listenersMutex_);
          thisModule.listenersMap_[name].emplace(id, callbackRef);
        }}

        auto modulePtr = &thisModule;
        auto cleanup = [modulePtr, name, id] {{
          std::lock_guard<std::mutex> lock(modulePtr->listenersMutex_);
          auto eventMap = modulePtr->listenersMap_.find(name);
          if (eventMap != modulePtr->listenersMap_.end()) {{
            eventMap->second.erase(id);
          }}
          return jsi::Value::undefined();
        }};

        return jsi::Function::createFromHostFunction(
            rt,
            jsi::PropNameID::forAscii(rt, \"cleanup\"),
            0,
            [cleanup](jsi::Runtime &rt, const jsi::Value &, const jsi::Value *, size_t) -> jsi::Value {{
              return cleanup();
            }});",
        js = signal.js_name,
    };

    format!(
        "{}\n  try {{\n{}\n{METHOD_EPILOGUE}",
        method_prologue(class, &signal.cxx_name),
        indent(&body, 4),
    )
}

/// `bridging-generated.hpp`: string and vector bridging plus one specialization per shape.
pub(super) fn bridging_header(ctx: &CodegenContext) -> GeneratedFile {
    let mut includes = Vec::new();
    let mut specializations = Vec::new();
    for module in ctx.modules() {
        includes.push(format!("#include \"{}.rs.h\"", module.names.bridge_mod()));
        specializations.extend(module_specializations(module));
    }

    let specializations = if specializations.is_empty() {
        String::new()
    } else {
        format!("\n{}\n", specializations.join("\n\n"))
    };

    let content = formatdoc! {"
        {header}
        #pragma once

        #include \"cxx.h\"
        {includes}
        #include <react/bridging/Bridging.h>

        using namespace facebook;

        namespace facebook {{
        namespace react {{

        {common}
        {specializations}
        }} // namespace react
        }} // namespace facebook
        ",
        header = ctx.header("//", ctx.project_hash()),
        includes = includes.join("\n"),
        common = COMMON_BRIDGING,
        specializations = specializations,
    };
    GeneratedFile::generated(ctx.layout.cpp_dir().join("bridging-generated.hpp"), content)
}

pub(crate) fn module_specializations(module: &BoundModule) -> Vec<String> {
    bridge_shapes(module)
        .iter()
        .filter_map(|shape| match shape {
            Shape::Enum(name) => module.enum_type(name).map(|e| enum_bridging(module, e)),
            Shape::Record(name) => module.record(name).map(|r| record_bridging(module, r)),
            Shape::Nullable(ty) => Some(nullable_bridging(module, ty)),
        })
        .collect()
}

fn record_bridging(module: &BoundModule, record: &BoundRecord) -> String {
    let ty = cxx_type(&TargetType::Record(record.js_name.clone()), module);
    let reads = record
        .fields
        .iter()
        .map(|f| {
            format!(
                "auto {0} = obj.getProperty(rt, \"{1}\");",
                cxx_local(&f.rust_name),
                f.js_name
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let inits = record
        .fields
        .iter()
        .map(|f| {
            format!(
                "react::bridging::fromJs<{}>(rt, {}, callInvoker),",
                cxx_type(&f.ty, module),
                cxx_local(&f.rust_name)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let writes = record
        .fields
        .iter()
        .map(|f| {
            format!(
                "obj.setProperty(rt, \"{}\", react::bridging::toJs(rt, value.{}));",
                f.js_name,
                f.rust_name.trim_start_matches("r#")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    formatdoc! {"
        template <>
        struct Bridging<{ty}> {{
          static {ty} fromJs(jsi::Runtime &rt, const jsi::Value &value, std::shared_ptr<CallInvoker> callInvoker) {{
            auto obj = value.asObject(rt);
        {reads}

            {ty} ret = {{
        {inits}
            }};

            return ret;
          }}

          static jsi::Value toJs(jsi::Runtime &rt, const {ty} &value) {{
            jsi::Object obj = jsi::Object(rt);
        {writes}

            return jsi::Value(rt, obj);
          }}
        }};",
        ty = ty,
        reads = indent(&reads, 4),
        inits = indent(&inits, 6),
        writes = indent(&writes, 4),
    }
}

/// Local variable name for a field, clear of the surrounding parameter names.
fn cxx_local(rust_name: &str) -> String {
    format!("{}_", rust_name.trim_start_matches("r#"))
}

fn enum_bridging(module: &BoundModule, e: &BoundEnum) -> String {
    let ty = cxx_type(&TargetType::Enum(e.js_name.clone()), module);
    let is_string = matches!(
        e.variants.first().map(|v| &v.value),
        Some(EnumValue::String(_))
    );

    let from_branches = e
        .variants
        .iter()
        .map(|v| match &v.value {
            EnumValue::String(s) => format!(
                "if (raw == {}) {{\n  return {ty}::{};\n}}",
                cxx_string(s),
                v.name
            ),
            EnumValue::Number(n) => format!("if (raw == {n}) {{\n  return {ty}::{};\n}}", v.name),
        })
        .collect::<Vec<_>>()
        .join(" else ");
    let to_cases = e
        .variants
        .iter()
        .map(|v| match &v.value {
            EnumValue::String(s) => format!(
                "case {ty}::{}:\n  return jsi::Value(rt, jsi::String::createFromUtf8(rt, {}));",
                v.name,
                cxx_string(s)
            ),
            EnumValue::Number(n) => format!("case {ty}::{}:\n  return jsi::Value({n});", v.name),
        })
        .collect::<Vec<_>>()
        .join("\n");
    let read = if is_string {
        "auto raw = value.asString(rt).utf8(rt);"
    } else {
        "auto raw = static_cast<int64_t>(value.asNumber());"
    };

    formatdoc! {"
        template <>
        struct Bridging<{ty}> {{
          static {ty} fromJs(jsi::Runtime &rt, const jsi::Value &value, std::shared_ptr<CallInvoker> callInvoker) {{
            {read}
        {from_branches}
            throw jsi::JSError(rt, \"Invalid enum value ({name})\");
          }}

          static jsi::Value toJs(jsi::Runtime &rt, {ty} value) {{
            switch (value) {{
        {to_cases}
            default:
              throw jsi::JSError(rt, \"Invalid enum value ({name})\");
            }}
          }}
        }};",
        ty = ty,
        read = read,
        from_branches = indent(&from_branches, 4),
        to_cases = indent(&to_cases, 4),
        name = e.name,
    }
}

fn nullable_bridging(module: &BoundModule, ty: &TargetType) -> String {
    let inner = match ty {
        TargetType::Nullable(inner) => inner.as_ref(),
        other => other,
    };
    formatdoc! {"
        template <>
        struct Bridging<{ty}> {{
          static {ty} fromJs(jsi::Runtime &rt, const jsi::Value &value, std::shared_ptr<CallInvoker> callInvoker) {{
            if (value.isNull() || value.isUndefined()) {{
              return {ty}{{true, {{}}}};
            }}

            auto val = react::bridging::fromJs<{inner}>(rt, value, callInvoker);
            return {ty}{{false, val}};
          }}

          static jsi::Value toJs(jsi::Runtime &rt, const {ty} &value) {{
            if (value.null) {{
              return jsi::Value::null();
            }}

            return react::bridging::toJs(rt, value.val);
          }}
        }};",
        ty = cxx_type(ty, module),
        inner = cxx_type(inner, module),
    }
}

const COMMON_BRIDGING: &str = indoc::indoc! {"
    template <>
    struct Bridging<rust::Str> {
      static rust::Str fromJs(jsi::Runtime &rt, const jsi::Value &value, std::shared_ptr<CallInvoker> callInvoker) {
        auto str = value.asString(rt).utf8(rt);
        return rust::Str(str.data(), str.size());
      }

      static jsi::Value toJs(jsi::Runtime &rt, const rust::Str &value) {
        return react::bridging::toJs(rt, std::string(value.data(), value.size()));
      }
    };

    template <>
    struct Bridging<rust::String> {
      static rust::String fromJs(jsi::Runtime &rt, const jsi::Value &value, std::shared_ptr<CallInvoker> callInvoker) {
        auto str = value.asString(rt).utf8(rt);
        return rust::String(str.data(), str.size());
      }

      static jsi::Value toJs(jsi::Runtime &rt, const rust::String &value) {
        return react::bridging::toJs(rt, std::string(value.data(), value.size()));
      }
    };

    template <typename T>
    struct Bridging<rust::Vec<T>> {
      static rust::Vec<T> fromJs(jsi::Runtime &rt, const jsi::Value &value, std::shared_ptr<CallInvoker> callInvoker) {
        auto arr = value.asObject(rt).asArray(rt);
        size_t len = arr.length(rt);
        rust::Vec<T> vec;
        vec.reserve(len);

        for (size_t i = 0; i < len; i++) {
          auto element = arr.getValueAtIndex(rt, i);
          vec.push_back(react::bridging::fromJs<T>(rt, element, callInvoker));
        }

        return vec;
      }

      static jsi::Array toJs(jsi::Runtime &rt, const rust::Vec<T> &vec) {
        auto arr = jsi::Array(rt, vec.size());

        for (size_t i = 0; i < vec.size(); i++) {
          arr.setValueAtIndex(rt, i, react::bridging::toJs(rt, vec[i]));
        }

        return arr;
      }
    };"};

/// C++ string literal for `s`. Control characters use octal escapes, which stop after
/// three digits; UTF-8 passes through.
pub(super) fn cxx_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => out.push_str(&format!("\\{:03o}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
