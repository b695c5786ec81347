//! Static C++ support headers shared by every generated module.

use indoc::indoc;

use crate::codegen::{CodegenContext, GeneratedFile};

pub(super) fn runtime_headers(ctx: &CodegenContext) -> Vec<GeneratedFile> {
    let header = ctx.header("//", ctx.project_hash());
    let dir = ctx.layout.cpp_dir();
    let mut files = vec![GeneratedFile::generated(
        dir.join("CrabyUtils.hpp"),
        format!("{header}\n{UTILS_HPP}"),
    )];
    if ctx.has_signals() {
        files.push(GeneratedFile::generated(
            dir.join("CrabySignals.h"),
            format!("{header}\n{SIGNALS_H}"),
        ));
    }
    files
}

const UTILS_HPP: &str = indoc! {"
    #pragma once

    #include \"cxx.h\"
    #include <condition_variable>
    #include <functional>
    #include <mutex>
    #include <queue>
    #include <string>
    #include <thread>
    #include <vector>

    namespace craby {
    namespace utils {

    class ThreadPool {
    private:
      std::vector<std::thread> workers;
      std::queue<std::function<void()>> tasks;
      std::mutex mutex;
      std::condition_variable condition;
      bool stop;

    public:
      ThreadPool(size_t num_threads = 10) : stop(false) {
        for (size_t i = 0; i < num_threads; ++i) {
          workers.emplace_back([this] {
            while (true) {
              std::function<void()> task;

              {
                std::unique_lock<std::mutex> lock(this->mutex);
                this->condition.wait(
                    lock, [this] { return this->stop || !this->tasks.empty(); });

                if (this->stop && this->tasks.empty()) {
                  return;
                }

                task = std::move(this->tasks.front());
                this->tasks.pop();
              }

              task();
            }
          });
        }
      }

      template <class F> void enqueue(F &&f) {
        {
          std::unique_lock<std::mutex> lock(mutex);
          if (stop) {
            return;
          }
          tasks.emplace(std::forward<F>(f));
        }
        condition.notify_one();
      }

      void shutdown() {
        {
          std::unique_lock<std::mutex> lock(mutex);
          stop = true;
          std::queue<std::function<void()>> empty;
          std::swap(tasks, empty);
        }

        condition.notify_all();

        for (std::thread &worker : workers) {
          if (worker.joinable()) {
            worker.join();
          }
        }
      }

      ~ThreadPool() {
        shutdown();
      }
    };

    inline std::string errorMessage(const std::exception &err) {
      const auto *rs_err = dynamic_cast<const rust::Error *>(&err);
      return std::string(rs_err ? rs_err->what() : err.what());
    }

    } // namespace utils
    } // namespace craby
"};

const SIGNALS_H: &str = indoc! {"
    #pragma once

    #include \"rust/cxx.h\"
    #include <functional>
    #include <memory>
    #include <mutex>
    #include <string>
    #include <unordered_map>

    namespace craby {
    namespace signals {

    using Delegate = std::function<void(const std::string &signalName)>;

    class SignalManager {
    public:
      static SignalManager &getInstance() {
        static SignalManager instance;
        return instance;
      }

      void emit(uintptr_t id, rust::Str name) const {
        Delegate delegate;
        {
          std::lock_guard<std::mutex> lock(mutex_);
          auto it = delegates_.find(id);
          if (it == delegates_.end()) {
            return;
          }
          delegate = it->second;
        }
        delegate(std::string(name));
      }

      void registerDelegate(uintptr_t id, Delegate delegate) const {
        std::lock_guard<std::mutex> lock(mutex_);
        delegates_.insert_or_assign(id, delegate);
      }

      void unregisterDelegate(uintptr_t id) const {
        std::lock_guard<std::mutex> lock(mutex_);
        delegates_.erase(id);
      }

    private:
      SignalManager() = default;
      mutable std::unordered_map<uintptr_t, Delegate> delegates_;
      mutable std::mutex mutex_;
    };

    inline const SignalManager &getSignalManager() {
      return SignalManager::getInstance();
    }

    } // namespace signals
    } // namespace craby
"};
