//! Android registration: JNI entry, CMake target and the React package that runs the
//! bootstrap handshake.

use craby_core::layout::lib_name;
use craby_core::naming::{to_kebab_case, to_pascal_case};
use indoc::formatdoc;

use crate::bind::BoundModule;
use crate::bootstrap::prepare_module_name;
use crate::codegen::{CodegenContext, GeneratedFile, indent};

pub(super) fn android_files(ctx: &CodegenContext) -> Vec<GeneratedFile> {
    let jni_dir = ctx.layout.jni_dir();
    let package_dir = ctx.layout.kotlin_package_dir(&ctx.android_package);
    let hash = ctx.project_hash();
    vec![
        GeneratedFile::generated(
            jni_dir.join("OnLoad.cpp"),
            format!("{}\n{}", ctx.header("//", hash), on_load(ctx)),
        ),
        GeneratedFile::generated(
            jni_dir.join("CMakeLists.txt"),
            format!("{}\n{}", ctx.header("#", hash), cmake_lists(ctx)),
        ),
        GeneratedFile::generated(
            package_dir.join(format!("{}.kt", package_class(ctx))),
            format!("{}\n{}", ctx.header("//", hash), package_kt(ctx)),
        ),
    ]
}

pub(crate) fn package_class(ctx: &CodegenContext) -> String {
    format!("{}Package", to_pascal_case(&ctx.project_name))
}

/// JNI symbol for a native method of the package class.
///
/// Package segments join with `_`, and an underscore inside a name escapes to `_1`.
pub(crate) fn jni_symbol(package: &str, class: &str, method: &str) -> String {
    let escape = |s: &str| s.replace('_', "_1");
    let package = package.split('.').map(escape).collect::<Vec<_>>().join("_");
    format!("Java_{package}_{}_{}", escape(class), escape(method))
}

fn cxx_class_path(module: &BoundModule) -> String {
    format!(
        "{}::{}",
        module.names.cxx_namespace(),
        module.names.cxx_class()
    )
}

pub(crate) fn on_load(ctx: &CodegenContext) -> String {
    let mut includes = Vec::new();
    let mut prepares = Vec::new();
    let mut registers = Vec::new();
    for module in ctx.modules() {
        let class = cxx_class_path(module);
        includes.push(format!("#include <{}.hpp>", module.names.cxx_class()));
        prepares.push(format!("{class}::dataPath = dataPath;"));
        registers.push(formatdoc! {"
            facebook::react::registerCxxModuleToGlobalModuleMap(
                {class}::kModuleName,
                [](std::shared_ptr<facebook::react::CallInvoker> jsInvoker) {{
                  return std::make_shared<{class}>(jsInvoker);
                }});",
            class = class,
        });
    }

    formatdoc! {"
        {includes}
        #include <ReactCommon/CxxTurboModuleUtils.h>
        #include <jni.h>
        #include <string>

        jint JNI_OnLoad(JavaVM *vm, void *reserved) {{
        {registers}
          return JNI_VERSION_1_6;
        }}

        extern \"C\"
        JNIEXPORT void JNICALL
        {symbol}(JNIEnv *env, jclass clazz, jstring jDataPath) {{
          const char *cDataPath = env->GetStringUTFChars(jDataPath, nullptr);
          auto dataPath = std::string(cDataPath);
          env->ReleaseStringUTFChars(jDataPath, cDataPath);
        {prepares}
        }}
        ",
        includes = includes.join("\n"),
        registers = indent(&registers.join("\n"), 2),
        symbol = jni_symbol(&ctx.android_package, &package_class(ctx), "nativeSetDataPath"),
        prepares = indent(&prepares.join("\n"), 2),
    }
}

pub(crate) fn cmake_lists(ctx: &CodegenContext) -> String {
    let kebab = to_kebab_case(&ctx.project_name);
    let sources = ctx
        .modules()
        .flat_map(|m| {
            [
                format!("${{CMAKE_SOURCE_DIR}}/src/{}.rs.cc", m.names.bridge_mod()),
                format!("${{CPP_DIR}}/{}.cpp", m.names.cxx_class()),
            ]
        })
        .collect::<Vec<_>>()
        .join("\n");

    formatdoc! {"
        cmake_minimum_required(VERSION 3.13)

        project(craby-{kebab})

        set(CMAKE_VERBOSE_MAKEFILE ON)
        set(CMAKE_CXX_STANDARD 20)
        set(CPP_DIR \"${{CMAKE_SOURCE_DIR}}/../../../../cpp\")

        find_package(ReactAndroid REQUIRED CONFIG)

        add_library({kebab}-lib STATIC IMPORTED)
        set_target_properties({kebab}-lib PROPERTIES
          IMPORTED_LOCATION \"${{CMAKE_SOURCE_DIR}}/libs/${{ANDROID_ABI}}/lib{lib}-prebuilt.a\"
        )
        target_include_directories({kebab}-lib INTERFACE
          \"${{CMAKE_SOURCE_DIR}}/include\"
        )

        add_library(cxx-{kebab} SHARED
          ${{CMAKE_SOURCE_DIR}}/OnLoad.cpp
        {sources}
        )
        target_include_directories(cxx-{kebab} PRIVATE
          ${{CPP_DIR}}
        )

        target_link_libraries(cxx-{kebab}
          ReactAndroid::reactnative
          ReactAndroid::jsi
          {kebab}-lib
        )

        target_compile_definitions(cxx-{kebab} PRIVATE
          -DFOLLY_NO_CONFIG=1
          -DFOLLY_HAVE_CLOCK_GETTIME=1
          -DFOLLY_USE_LIBCPP=1
          -DFOLLY_CFG_NO_COROUTINES=1
          -DFOLLY_MOBILE=1
          -DFOLLY_HAVE_RECVMMSG=1
          -DFOLLY_HAVE_PTHREAD=1
          -DFOLLY_HAVE_XSI_STRERROR_R=1
        )
        ",
        kebab = kebab,
        lib = lib_name(&ctx.project_name),
        sources = indent(&sources, 2),
    }
}

/// The package answers lookups for prepare names by handing the files directory to
/// the binding layer, then reports that no such module exists.
pub(crate) fn package_kt(ctx: &CodegenContext) -> String {
    let prepare_names = ctx
        .modules()
        .map(|m| format!("\"{}\"", prepare_module_name(&m.names.js)))
        .collect::<Vec<_>>()
        .join(",\n");

    formatdoc! {"
        package {package}

        import com.facebook.react.BaseReactPackage
        import com.facebook.react.bridge.NativeModule
        import com.facebook.react.bridge.ReactApplicationContext
        import com.facebook.react.module.model.ReactModuleInfo
        import com.facebook.react.module.model.ReactModuleInfoProvider
        import com.facebook.soloader.SoLoader

        class {class} : BaseReactPackage() {{
          companion object {{
            val JNI_PREPARE_MODULE_NAMES = setOf(
        {prepare_names}
            )
          }}

          init {{
            SoLoader.loadLibrary(\"cxx-{kebab}\")
          }}

          override fun getModule(name: String, reactContext: ReactApplicationContext): NativeModule? {{
            if (name in JNI_PREPARE_MODULE_NAMES) {{
              nativeSetDataPath(reactContext.filesDir.absolutePath)
            }}
            return null
          }}

          override fun getReactModuleInfoProvider(): ReactModuleInfoProvider {{
            return ReactModuleInfoProvider {{
              val moduleInfos: MutableMap<String, ReactModuleInfo> = HashMap()
              JNI_PREPARE_MODULE_NAMES.forEach {{ name ->
                moduleInfos[name] = ReactModuleInfo(
                  name,
                  name,
                  false, // canOverrideExistingModule
                  false, // needsEagerInit
                  false, // isCxxModule
                  true, // isTurboModule
                )
              }}
              moduleInfos
            }}
          }}

          private external fun nativeSetDataPath(dataPath: String)
        }}
        ",
        package = ctx.android_package,
        class = package_class(ctx),
        prepare_names = indent(&prepare_names, 6),
        kebab = to_kebab_case(&ctx.project_name),
    }
}
